use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::auth::application::ports::outgoing::{
    CookieCodec, InboundCookies, OutboundCookies, RefreshTokenRepository,
    RefreshTokenRepositoryError, REFRESH_TOKEN_COOKIE,
};
use crate::shared::ErrorKind;

/// What happened to the server-side session during logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The refresh token record was found and deleted.
    Revoked,
    /// A cookie was sent but no record matched it.
    UnknownToken,
    /// The request carried no refresh token cookie.
    NoSession,
    /// The token store failed; the record may still exist until it expires.
    RevocationFailed,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LogoutError {
    #[error("Token revocation failed: {0}")]
    TokenRevocationFailed(String),
}

impl LogoutError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

impl From<RefreshTokenRepositoryError> for LogoutError {
    fn from(error: RefreshTokenRepositoryError) -> Self {
        LogoutError::TokenRevocationFailed(error.to_string())
    }
}

/// Best-effort session teardown. The deletion directive for the refresh
/// cookie is attached to `response` on every path and a store failure is
/// logged and reported as [`LogoutOutcome::RevocationFailed`], so the client
/// always ends up signed out.
#[async_trait]
pub trait ILogoutUseCase: Send + Sync {
    async fn execute(
        &self,
        request: &InboundCookies,
        response: &mut OutboundCookies,
    ) -> Result<LogoutOutcome, LogoutError>;
}

#[derive(Clone)]
pub struct LogoutUseCase {
    token_repository: Arc<dyn RefreshTokenRepository>,
    cookie_codec: Arc<dyn CookieCodec>,
}

impl LogoutUseCase {
    pub fn new(
        token_repository: Arc<dyn RefreshTokenRepository>,
        cookie_codec: Arc<dyn CookieCodec>,
    ) -> Self {
        Self {
            token_repository,
            cookie_codec,
        }
    }

    async fn revoke(&self, request: &InboundCookies) -> Result<LogoutOutcome, LogoutError> {
        let Some(cookie) = self.cookie_codec.read_cookie(request, REFRESH_TOKEN_COOKIE) else {
            return Ok(LogoutOutcome::NoSession);
        };

        let Some(token) = self
            .token_repository
            .find_by_token_value(&cookie.value)
            .await?
        else {
            warn!("Logout with a refresh token that is not on record");
            return Ok(LogoutOutcome::UnknownToken);
        };

        self.token_repository.delete(&token).await?;
        info!(user_id = %token.user_id, "Refresh token revoked");
        Ok(LogoutOutcome::Revoked)
    }
}

#[async_trait]
impl ILogoutUseCase for LogoutUseCase {
    async fn execute(
        &self,
        request: &InboundCookies,
        response: &mut OutboundCookies,
    ) -> Result<LogoutOutcome, LogoutError> {
        let outcome = match self.revoke(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Refresh token revocation failed during logout");
                LogoutOutcome::RevocationFailed
            }
        };

        response.attach(
            self.cookie_codec
                .build_deletion_directive(REFRESH_TOKEN_COOKIE),
        );
        Ok(outcome)
    }
}
