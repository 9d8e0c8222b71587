use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::application::domain::entities::{normalize_email, RefreshToken};
use crate::auth::application::ports::outgoing::{
    CookieCodec, KeyGenerator, OutboundCookies, PasswordHasher, RefreshTokenRepository,
    RefreshTokenRepositoryError, TokenProvider, UserRepository, REFRESH_TOKEN_COOKIE,
};
use crate::shared::ErrorKind;

/// Refresh token values are regenerated this many times on a collision
/// before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 3;

#[derive(Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("Account setup is not finished")]
    ProfileIncomplete,

    #[error("Password verification failed: {0}")]
    HashingFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl LoginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoginError::InvalidCredentials => ErrorKind::Unauthorized,
            LoginError::EmailNotConfirmed | LoginError::ProfileIncomplete => {
                ErrorKind::Precondition
            }
            LoginError::HashingFailed(_)
            | LoginError::TokenGenerationFailed(_)
            | LoginError::RepositoryError(_) => ErrorKind::Internal,
        }
    }
}

/// Verifies credentials, issues an access token and stores a fresh refresh
/// token whose value travels back in the `X-AUTH-REFRESH-TOKEN` cookie.
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(
        &self,
        input: LoginInput,
        response: &mut OutboundCookies,
    ) -> Result<LoginOutput, LoginError>;
}

#[derive(Clone)]
pub struct LoginUserUseCase<R>
where
    R: UserRepository,
{
    repository: R,
    token_repository: Arc<dyn RefreshTokenRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_provider: Arc<dyn TokenProvider>,
    key_generator: Arc<dyn KeyGenerator>,
    cookie_codec: Arc<dyn CookieCodec>,
    refresh_token_lifetime: Duration,
}

impl<R> LoginUserUseCase<R>
where
    R: UserRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: R,
        token_repository: Arc<dyn RefreshTokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_provider: Arc<dyn TokenProvider>,
        key_generator: Arc<dyn KeyGenerator>,
        cookie_codec: Arc<dyn CookieCodec>,
        refresh_token_lifetime: Duration,
    ) -> Self {
        Self {
            repository,
            token_repository,
            password_hasher,
            token_provider,
            key_generator,
            cookie_codec,
            refresh_token_lifetime,
        }
    }

    async fn store_refresh_token(&self, user_id: Uuid) -> Result<RefreshToken, LoginError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token =
                RefreshToken::issue(self.key_generator.generate(), user_id, self.refresh_token_lifetime);
            match self.token_repository.save(token.clone()).await {
                Ok(()) => return Ok(token),
                Err(RefreshTokenRepositoryError::TokenAlreadyExists) => {
                    warn!(user_id = %user_id, "Refresh token collision, regenerating");
                }
                Err(e) => return Err(LoginError::RepositoryError(e.to_string())),
            }
        }
        Err(LoginError::TokenGenerationFailed(
            "could not allocate a unique refresh token".to_string(),
        ))
    }
}

#[async_trait]
impl<R> ILoginUserUseCase for LoginUserUseCase<R>
where
    R: UserRepository,
{
    async fn execute(
        &self,
        input: LoginInput,
        response: &mut OutboundCookies,
    ) -> Result<LoginOutput, LoginError> {
        let email = normalize_email(&input.email);
        let user = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(|e| LoginError::RepositoryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        if !user.email_confirmed {
            return Err(LoginError::EmailNotConfirmed);
        }
        let Some(password_hash) = user.password_hash.as_deref() else {
            return Err(LoginError::ProfileIncomplete);
        };

        let is_valid = self
            .password_hasher
            .verify_password(&input.password, password_hash)
            .await
            .map_err(|e| LoginError::HashingFailed(e.to_string()))?;
        if !is_valid {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let access_token = self
            .token_provider
            .generate_access_token(user.id)
            .map_err(|e| {
                error!(user_id = %user.id, error = %e, "Access token generation failed");
                LoginError::TokenGenerationFailed(e.to_string())
            })?;

        let refresh_token = self.store_refresh_token(user.id).await?;
        response.attach(self.cookie_codec.build_session_directive(
            REFRESH_TOKEN_COOKIE,
            &refresh_token.token_value,
            self.refresh_token_lifetime.num_seconds(),
        ));

        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutput {
            user_id: user.id,
            access_token,
            refresh_token_expires_at: refresh_token.expires_at,
        })
    }
}
