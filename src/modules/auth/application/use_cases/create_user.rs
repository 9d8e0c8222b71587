use std::sync::Arc;

use async_trait::async_trait;
use email_address::EmailAddress;
use tracing::{info, warn};

use crate::auth::application::domain::entities::{normalize_email, User};
use crate::auth::application::ports::outgoing::{
    KeyGenerator, UserRepository, UserRepositoryError,
};
use crate::shared::ErrorKind;

/// Confirmation keys are regenerated this many times on a collision before
/// giving up.
const MAX_KEY_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CreateUserError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Email address is already registered")]
    EmailAlreadyExists,

    #[error("Could not allocate a unique confirmation key")]
    KeyGenerationFailed,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl CreateUserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreateUserError::InvalidEmail(_) => ErrorKind::Validation,
            CreateUserError::EmailAlreadyExists => ErrorKind::Conflict,
            CreateUserError::KeyGenerationFailed | CreateUserError::RepositoryError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<UserRepositoryError> for CreateUserError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserAlreadyExists => CreateUserError::EmailAlreadyExists,
            UserRepositoryError::DatabaseError(msg) => CreateUserError::RepositoryError(msg),
        }
    }
}

/// Persists a new unconfirmed account for an email address.
#[async_trait]
pub trait ICreateUserUseCase: Send + Sync {
    async fn execute(&self, email: &str) -> Result<User, CreateUserError>;
}

#[derive(Clone)]
pub struct CreateUserUseCase<R>
where
    R: UserRepository,
{
    repository: R,
    key_generator: Arc<dyn KeyGenerator>,
}

impl<R> CreateUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repository: R, key_generator: Arc<dyn KeyGenerator>) -> Self {
        Self {
            repository,
            key_generator,
        }
    }

    /// A unique violation is an email conflict when the address has appeared
    /// since the pre-check. Otherwise the confirmation key collided and a new
    /// one is drawn.
    async fn save_with_fresh_key(&self, email: &str) -> Result<User, CreateUserError> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let user = User::register(email.to_string(), self.key_generator.generate());
            match self.repository.save(user).await {
                Ok(saved) => return Ok(saved),
                Err(UserRepositoryError::UserAlreadyExists) => {
                    if self.repository.find_by_email(email).await?.is_some() {
                        warn!(email = %email, "Email registered concurrently");
                        return Err(CreateUserError::EmailAlreadyExists);
                    }
                    warn!(email = %email, "Confirmation key collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(CreateUserError::KeyGenerationFailed)
    }
}

#[async_trait]
impl<R> ICreateUserUseCase for CreateUserUseCase<R>
where
    R: UserRepository,
{
    async fn execute(&self, email: &str) -> Result<User, CreateUserError> {
        let email = normalize_email(email);
        if !EmailAddress::is_valid(&email) {
            warn!(email = %email, "Rejected registration with malformed email");
            return Err(CreateUserError::InvalidEmail(email));
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration attempted for existing email");
            return Err(CreateUserError::EmailAlreadyExists);
        }

        let saved = self.save_with_fresh_key(&email).await?;

        info!(user_id = %saved.id, email = %saved.email, "Unconfirmed user created");
        Ok(saved)
    }
}
