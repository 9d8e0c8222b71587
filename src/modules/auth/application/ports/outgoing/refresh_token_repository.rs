use crate::modules::auth::application::domain::entities::RefreshToken;
use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RefreshTokenRepositoryError {
    #[error("Refresh token already exists")]
    TokenAlreadyExists,

    #[error("Refresh token is already expired")]
    TokenExpired,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Storage for issued refresh tokens. Token values are unique across all
/// live records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn save(&self, token: RefreshToken) -> Result<(), RefreshTokenRepositoryError>;

    async fn find_by_token_value(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError>;

    /// Deleting a record that is already gone succeeds.
    async fn delete(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError>;
}
