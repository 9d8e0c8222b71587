use uuid::Uuid;

use crate::auth::application::domain::entities::{RefreshToken, User};
use crate::auth::application::ports::outgoing::{CookieDirective, SameSitePolicy};
use crate::config::{CookieConfig, JwtConfig};

pub const TEST_EMAIL: &str = "test@test.com";

pub fn fake_user_id() -> Uuid {
    Uuid::from_u128(1)
}

/// Unconfirmed account as produced by registration.
pub fn create_user() -> User {
    User::builder(TEST_EMAIL)
        .id(fake_user_id())
        .username("test")
        .email_confirmed(false)
        .build()
}

pub fn unconfirmed_user_with_key(key: &str) -> User {
    User::builder(TEST_EMAIL)
        .id(fake_user_id())
        .email_confirmation_key(key)
        .build()
}

pub fn confirmed_user() -> User {
    User::builder(TEST_EMAIL)
        .id(fake_user_id())
        .username("test")
        .email_confirmed(true)
        .build()
}

pub fn active_user(password_hash: &str) -> User {
    User::builder(TEST_EMAIL)
        .id(fake_user_id())
        .username("test")
        .email_confirmed(true)
        .password_hash(password_hash)
        .build()
}

pub fn refresh_token(value: &str) -> RefreshToken {
    RefreshToken::issue(value.to_string(), fake_user_id(), chrono::Duration::days(14))
}

pub fn deletion_directive(name: &str) -> CookieDirective {
    CookieDirective {
        name: name.to_string(),
        value: String::new(),
        max_age_secs: 0,
        path: "/".to_string(),
        domain: None,
        http_only: true,
        secure: true,
        same_site: SameSitePolicy::Lax,
    }
}

pub fn cookie_config() -> CookieConfig {
    CookieConfig {
        secure: true,
        path: "/".to_string(),
        domain: None,
        same_site: SameSitePolicy::Lax,
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret_key: "test_secret_key_for_testing_only_0123456789".to_string(),
        issuer: "qna-test".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 86400,
    }
}
