pub mod cookies;

pub use cookies::{apply_cookies, inbound_cookies, to_actix_cookie, HttpCookieCodec};
