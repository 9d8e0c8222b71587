use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::auth::application::domain::entities::{normalize_email, User, UserStateError};
use crate::auth::application::ports::incoming::password_policy::{
    PasswordPolicy, PasswordPolicyError,
};
use crate::auth::application::ports::outgoing::{
    PasswordHasher, UserRepository, UserRepositoryError,
};
use crate::shared::ErrorKind;

/// Profile details submitted once the email address is confirmed.
#[derive(Clone, Deserialize)]
pub struct UserProfileDto {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for UserProfileDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfileDto")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompleteProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("Profile has already been completed")]
    ProfileAlreadyCompleted,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl CompleteProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompleteProfileError::UserNotFound => ErrorKind::NotFound,
            CompleteProfileError::EmailNotConfirmed
            | CompleteProfileError::ProfileAlreadyCompleted => ErrorKind::Precondition,
            CompleteProfileError::InvalidUsername(_) | CompleteProfileError::InvalidPassword(_) => {
                ErrorKind::Validation
            }
            CompleteProfileError::UsernameTaken => ErrorKind::Conflict,
            CompleteProfileError::HashingFailed(_) | CompleteProfileError::RepositoryError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<UserStateError> for CompleteProfileError {
    fn from(err: UserStateError) -> Self {
        match err {
            UserStateError::EmailNotConfirmed => CompleteProfileError::EmailNotConfirmed,
            UserStateError::ProfileAlreadyCompleted => {
                CompleteProfileError::ProfileAlreadyCompleted
            }
        }
    }
}

impl From<UserRepositoryError> for CompleteProfileError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UserAlreadyExists => CompleteProfileError::UsernameTaken,
            UserRepositoryError::DatabaseError(msg) => CompleteProfileError::RepositoryError(msg),
        }
    }
}

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("valid username pattern"))
}

fn validate_username(username: &str) -> Result<String, CompleteProfileError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CompleteProfileError::InvalidUsername(
            "username is required".to_string(),
        ));
    }
    if !username_pattern().is_match(username) {
        return Err(CompleteProfileError::InvalidUsername(
            "use 3-30 letters, digits or underscores".to_string(),
        ));
    }
    Ok(username.to_string())
}

/// Sets username and password on a confirmed account.
#[async_trait]
pub trait ICompleteProfileUseCase: Send + Sync {
    async fn execute(&self, dto: UserProfileDto) -> Result<User, CompleteProfileError>;
}

#[derive(Clone)]
pub struct CompleteProfileUseCase<R>
where
    R: UserRepository,
{
    repository: R,
    password_hasher: Arc<dyn PasswordHasher>,
    password_policy: Arc<dyn PasswordPolicy>,
}

impl<R> CompleteProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(
        repository: R,
        password_hasher: Arc<dyn PasswordHasher>,
        password_policy: Arc<dyn PasswordPolicy>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            password_policy,
        }
    }
}

#[async_trait]
impl<R> ICompleteProfileUseCase for CompleteProfileUseCase<R>
where
    R: UserRepository,
{
    async fn execute(&self, dto: UserProfileDto) -> Result<User, CompleteProfileError> {
        let username = validate_username(&dto.username)?;
        self.password_policy.validate(&dto.password)?;

        let email = normalize_email(&dto.email);
        let Some(mut user) = self.repository.find_by_email(&email).await? else {
            warn!(email = %email, "Profile completion for unknown email");
            return Err(CompleteProfileError::UserNotFound);
        };

        if !user.email_confirmed {
            warn!(user_id = %user.id, "Profile completion before email confirmation");
            return Err(CompleteProfileError::EmailNotConfirmed);
        }

        if user.password_hash.is_some() {
            warn!(user_id = %user.id, "Profile completion on an account that is already set up");
            return Err(CompleteProfileError::ProfileAlreadyCompleted);
        }

        let password_hash = self
            .password_hasher
            .hash_password(&dto.password)
            .await
            .map_err(|e| {
                error!(user_id = %user.id, error = %e, "Password hashing failed");
                CompleteProfileError::HashingFailed(e.to_string())
            })?;

        user.complete_profile(username, password_hash)?;

        let saved = self.repository.save(user).await?;
        info!(user_id = %saved.id, "User profile completed");
        Ok(saved)
    }
}
