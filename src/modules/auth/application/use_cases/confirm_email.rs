use async_trait::async_trait;
use tracing::{info, warn};

use crate::auth::application::ports::outgoing::{UserRepository, UserRepositoryError};
use crate::shared::ErrorKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfirmEmailError {
    #[error("No account is waiting for this confirmation key")]
    KeyNotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl ConfirmEmailError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfirmEmailError::KeyNotFound => ErrorKind::NotFound,
            ConfirmEmailError::RepositoryError(_) => ErrorKind::Internal,
        }
    }
}

impl From<UserRepositoryError> for ConfirmEmailError {
    fn from(err: UserRepositoryError) -> Self {
        ConfirmEmailError::RepositoryError(err.to_string())
    }
}

/// Marks the account holding `confirmation_key` as confirmed. Keys are
/// single-use: a second call with the same key fails with `KeyNotFound`.
#[async_trait]
pub trait IConfirmEmailUseCase: Send + Sync {
    async fn execute(&self, confirmation_key: &str) -> Result<(), ConfirmEmailError>;
}

#[derive(Debug, Clone)]
pub struct ConfirmEmailUseCase<R>
where
    R: UserRepository,
{
    repository: R,
}

impl<R> ConfirmEmailUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IConfirmEmailUseCase for ConfirmEmailUseCase<R>
where
    R: UserRepository,
{
    async fn execute(&self, confirmation_key: &str) -> Result<(), ConfirmEmailError> {
        let key = confirmation_key.trim();
        if key.is_empty() {
            return Err(ConfirmEmailError::KeyNotFound);
        }

        let Some(mut user) = self.repository.find_by_confirmation_key(key).await? else {
            warn!("Unknown or already used confirmation key");
            return Err(ConfirmEmailError::KeyNotFound);
        };

        user.confirm_email();
        let user = self.repository.save(user).await?;

        info!(user_id = %user.id, "Email confirmed");
        Ok(())
    }
}
