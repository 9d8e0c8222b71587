pub mod cookie_codec;
pub mod key_generator;
pub mod password_hasher;
pub mod refresh_token_repository;
pub mod token_provider;
pub mod user_repository;

pub use cookie_codec::{
    CookieCodec, CookieDirective, CookieValue, InboundCookies, OutboundCookies, SameSitePolicy,
    REFRESH_TOKEN_COOKIE,
};
pub use key_generator::KeyGenerator;
pub use password_hasher::{HashError, PasswordHasher};
pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenRepositoryError};
pub use token_provider::{TokenClaims, TokenError, TokenProvider};
pub use user_repository::{UserRepository, UserRepositoryError};
