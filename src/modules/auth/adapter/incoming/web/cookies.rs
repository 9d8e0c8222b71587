use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use tracing::warn;

use crate::auth::application::ports::outgoing::{
    CookieCodec, CookieDirective, CookieValue, InboundCookies, OutboundCookies, SameSitePolicy,
};
use crate::config::CookieConfig;

/// Cookie codec for actix-web. Every cookie it writes is `HttpOnly`; the
/// remaining attributes come from [`CookieConfig`].
#[derive(Debug, Clone)]
pub struct HttpCookieCodec {
    config: CookieConfig,
}

impl HttpCookieCodec {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    fn directive(&self, name: &str, value: &str, max_age_secs: i64) -> CookieDirective {
        CookieDirective {
            name: name.to_string(),
            value: value.to_string(),
            max_age_secs,
            path: self.config.path.clone(),
            domain: self.config.domain.clone(),
            http_only: true,
            secure: self.config.secure,
            same_site: self.config.same_site,
        }
    }
}

impl CookieCodec for HttpCookieCodec {
    fn read_cookie(&self, request: &InboundCookies, name: &str) -> Option<CookieValue> {
        let value = request.get(name)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(CookieValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn build_session_directive(
        &self,
        name: &str,
        value: &str,
        max_age_secs: i64,
    ) -> CookieDirective {
        self.directive(name, value, max_age_secs.max(0))
    }

    fn build_deletion_directive(&self, name: &str) -> CookieDirective {
        self.directive(name, "", 0)
    }
}

/// Snapshot of the cookies on an actix request. Unparseable cookie headers
/// yield an empty snapshot.
pub fn inbound_cookies(req: &HttpRequest) -> InboundCookies {
    match req.cookies() {
        Ok(cookies) => InboundCookies::from_pairs(
            cookies
                .iter()
                .map(|c| (c.name().to_string(), c.value().to_string())),
        ),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed Cookie header");
            InboundCookies::new()
        }
    }
}

pub fn to_actix_cookie(directive: &CookieDirective) -> Cookie<'static> {
    let same_site = match directive.same_site {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    };

    let mut builder = Cookie::build(directive.name.clone(), directive.value.clone())
        .path(directive.path.clone())
        .http_only(directive.http_only)
        .secure(directive.secure)
        .same_site(same_site)
        .max_age(Duration::seconds(directive.max_age_secs));
    if let Some(domain) = &directive.domain {
        builder = builder.domain(domain.clone());
    }
    builder.finish()
}

/// Writes every collected directive as a `Set-Cookie` header.
pub fn apply_cookies(response: &mut HttpResponseBuilder, cookies: &OutboundCookies) {
    for directive in cookies.directives() {
        response.cookie(to_actix_cookie(directive));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::ports::outgoing::REFRESH_TOKEN_COOKIE;
    use crate::tests::support::fixtures::cookie_config;
    use actix_web::{test::TestRequest, HttpResponse};

    fn codec() -> HttpCookieCodec {
        HttpCookieCodec::new(cookie_config())
    }

    #[test]
    fn reads_refresh_cookie_from_request() {
        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, "testKey"))
            .to_http_request();

        let inbound = inbound_cookies(&req);
        let value = codec().read_cookie(&inbound, REFRESH_TOKEN_COOKIE).unwrap();

        assert_eq!(value.value, "testKey");
        assert_eq!(value.name, REFRESH_TOKEN_COOKIE);
    }

    #[test]
    fn missing_or_blank_cookie_reads_as_none() {
        let empty = inbound_cookies(&TestRequest::default().to_http_request());
        assert!(codec().read_cookie(&empty, REFRESH_TOKEN_COOKIE).is_none());

        let blank = InboundCookies::from_pairs([(REFRESH_TOKEN_COOKIE, "  ")]);
        assert!(codec().read_cookie(&blank, REFRESH_TOKEN_COOKIE).is_none());
    }

    #[test]
    fn deletion_directive_expires_cookie() {
        let directive = codec().build_deletion_directive(REFRESH_TOKEN_COOKIE);

        assert!(directive.is_deletion());
        assert!(directive.http_only);
        assert!(directive.secure);
        assert_eq!(directive.path, "/");
    }

    #[test]
    fn session_directive_carries_value_and_lifetime() {
        let directive = codec().build_session_directive(REFRESH_TOKEN_COOKIE, "abc", 3600);

        assert_eq!(directive.value, "abc");
        assert_eq!(directive.max_age_secs, 3600);
        assert!(!directive.is_deletion());
    }

    #[test]
    fn applies_directives_as_set_cookie_headers() {
        let mut config = cookie_config();
        config.domain = Some("qna.example".to_string());
        config.same_site = SameSitePolicy::Strict;
        let codec = HttpCookieCodec::new(config);

        let mut outbound = OutboundCookies::new();
        outbound.attach(codec.build_deletion_directive(REFRESH_TOKEN_COOKIE));

        let mut builder = HttpResponse::Ok();
        apply_cookies(&mut builder, &outbound);
        let response = builder.finish();

        let cookie = response
            .cookies()
            .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.domain(), Some("qna.example"));
    }
}
