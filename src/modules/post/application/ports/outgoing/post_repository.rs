use async_trait::async_trait;
use uuid::Uuid;

use crate::post::application::domain::entities::Post;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PostRepositoryError {
    #[error("Stored post is inconsistent: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, PostRepositoryError>;

    /// Inserts or overwrites by id.
    async fn save(&self, post: Post) -> Result<Post, PostRepositoryError>;
}
