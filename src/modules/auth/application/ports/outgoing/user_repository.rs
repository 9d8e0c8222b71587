use crate::modules::auth::application::domain::entities::User;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or updates by id and returns the stored record.
    async fn save(&self, user: User) -> Result<User, UserRepositoryError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
    async fn find_by_confirmation_key(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
