use std::collections::HashMap;

/// Name of the cookie carrying the refresh token. Clients depend on this
/// exact spelling.
pub const REFRESH_TOKEN_COOKIE: &str = "X-AUTH-REFRESH-TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// What the response should tell the client to do with one cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    pub max_age_secs: i64,
    pub path: String,
    pub domain: Option<String>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
}

impl CookieDirective {
    /// A directive that expires the cookie on the client.
    pub fn is_deletion(&self) -> bool {
        self.max_age_secs == 0 && self.value.is_empty()
    }
}

/// Snapshot of the cookies sent with an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundCookies {
    cookies: HashMap<String, String>,
}

impl InboundCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cookies: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Directives accumulated for the outbound response, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundCookies {
    directives: Vec<CookieDirective>,
}

impl OutboundCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, directive: CookieDirective) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[CookieDirective] {
        &self.directives
    }

    pub fn find(&self, name: &str) -> Option<&CookieDirective> {
        self.directives.iter().rev().find(|d| d.name == name)
    }

    pub fn into_inner(self) -> Vec<CookieDirective> {
        self.directives
    }
}

pub trait CookieCodec: Send + Sync {
    fn read_cookie(&self, request: &InboundCookies, name: &str) -> Option<CookieValue>;

    fn build_session_directive(&self, name: &str, value: &str, max_age_secs: i64)
        -> CookieDirective;

    fn build_deletion_directive(&self, name: &str) -> CookieDirective;
}
