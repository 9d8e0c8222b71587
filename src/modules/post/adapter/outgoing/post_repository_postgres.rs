use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::post::application::domain::entities::{
    Post, PostKind, QuestionDetails, QuestionStatus, GENERAL_DISCRIMINATOR,
    QUESTION_DISCRIMINATOR,
};
use crate::post::application::ports::outgoing::post_repository::{
    PostRepository, PostRepositoryError,
};

use super::sea_orm_entity::posts::{
    ActiveModel as PostActiveModel, Entity as PostEntity, Model as PostModel,
};

#[derive(Clone, Debug)]
pub struct PostRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

fn db_error(e: DbErr) -> PostRepositoryError {
    PostRepositoryError::DatabaseError(e.to_string())
}

impl PostRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: PostModel) -> Result<Post, PostRepositoryError> {
        let kind = match model.dtype.as_str() {
            GENERAL_DISCRIMINATOR => PostKind::General,
            QUESTION_DISCRIMINATOR => {
                let raw = model.question_status.as_deref().ok_or_else(|| {
                    PostRepositoryError::CorruptRecord(format!(
                        "question {} has no status",
                        model.id
                    ))
                })?;
                let status = raw
                    .parse::<QuestionStatus>()
                    .map_err(|e| PostRepositoryError::CorruptRecord(e.to_string()))?;
                PostKind::Question(QuestionDetails { status })
            }
            other => {
                return Err(PostRepositoryError::CorruptRecord(format!(
                    "unknown post type '{other}'"
                )))
            }
        };

        let image_ids: Vec<Uuid> = serde_json::from_value(model.image_ids)
            .map_err(|e| PostRepositoryError::CorruptRecord(e.to_string()))?;

        Ok(Post {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            hit_count: model.hit_count,
            like_count: model.like_count,
            image_ids,
            kind,
        })
    }

    fn to_active_model(post: Post) -> PostActiveModel {
        let dtype = post.discriminator().to_string();
        let question_status = post.question_status().map(|s| s.as_str().to_string());
        PostActiveModel {
            id: Set(post.id),
            author_id: Set(post.author_id),
            dtype: Set(dtype),
            title: Set(post.title),
            content: Set(post.content),
            hit_count: Set(post.hit_count),
            like_count: Set(post.like_count),
            image_ids: Set(serde_json::json!(post.image_ids)),
            question_status: Set(question_status),
        }
    }
}

#[async_trait]
impl PostRepository for PostRepositoryPostgres {
    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, PostRepositoryError> {
        PostEntity::find_by_id(post_id)
            .one(&*self.db)
            .await
            .map_err(db_error)?
            .map(Self::to_domain)
            .transpose()
    }

    async fn save(&self, post: Post) -> Result<Post, PostRepositoryError> {
        let exists = PostEntity::find_by_id(post.id)
            .one(&*self.db)
            .await
            .map_err(db_error)?
            .is_some();

        let active = Self::to_active_model(post);
        let result = if exists {
            active.update(&*self.db).await
        } else {
            active.insert(&*self.db).await
        };

        Self::to_domain(result.map_err(db_error)?)
    }
}
