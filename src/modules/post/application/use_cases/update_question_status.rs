use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::post::application::domain::entities::{Post, PostError, QuestionStatus};
use crate::post::application::ports::outgoing::post_repository::{
    PostRepository, PostRepositoryError,
};
use crate::shared::ErrorKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateQuestionStatusError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Post is not a question")]
    NotAQuestion,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl UpdateQuestionStatusError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateQuestionStatusError::PostNotFound => ErrorKind::NotFound,
            UpdateQuestionStatusError::NotAQuestion => ErrorKind::Precondition,
            UpdateQuestionStatusError::RepositoryError(_) => ErrorKind::Internal,
        }
    }
}

impl From<PostRepositoryError> for UpdateQuestionStatusError {
    fn from(err: PostRepositoryError) -> Self {
        UpdateQuestionStatusError::RepositoryError(err.to_string())
    }
}

#[async_trait]
pub trait IUpdateQuestionStatusUseCase: Send + Sync {
    async fn execute(
        &self,
        post_id: Uuid,
        status: QuestionStatus,
    ) -> Result<Post, UpdateQuestionStatusError>;
}

#[derive(Debug, Clone)]
pub struct UpdateQuestionStatusUseCase<R>
where
    R: PostRepository,
{
    repository: R,
}

impl<R> UpdateQuestionStatusUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IUpdateQuestionStatusUseCase for UpdateQuestionStatusUseCase<R>
where
    R: PostRepository,
{
    async fn execute(
        &self,
        post_id: Uuid,
        status: QuestionStatus,
    ) -> Result<Post, UpdateQuestionStatusError> {
        let mut post = self
            .repository
            .find_by_id(post_id)
            .await?
            .ok_or(UpdateQuestionStatusError::PostNotFound)?;

        if let Err(PostError::NotAQuestion) = post.update_question_status(status) {
            warn!(post_id = %post_id, "Status update on a post that is not a question");
            return Err(UpdateQuestionStatusError::NotAQuestion);
        }

        let saved = self.repository.save(post).await?;
        info!(post_id = %saved.id, status = %status, "Question status updated");
        Ok(saved)
    }
}
