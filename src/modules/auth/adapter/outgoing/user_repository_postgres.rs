use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::user_repository::{
    UserRepository, UserRepositoryError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: UserModel) -> User {
        let mut builder = User::builder(model.email)
            .id(model.id)
            .email_confirmed(model.email_confirmed)
            .created_at(model.created_at.with_timezone(&Utc))
            .updated_at(model.updated_at.with_timezone(&Utc));
        if let Some(username) = model.username {
            builder = builder.username(username);
        }
        if let Some(hash) = model.password_hash {
            builder = builder.password_hash(hash);
        }
        if let Some(key) = model.email_confirmation_key {
            builder = builder.email_confirmation_key(key);
        }
        builder.build()
    }

    fn to_active_model(user: User) -> UserActiveModel {
        UserActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            email_confirmed: Set(user.email_confirmed),
            email_confirmation_key: Set(user.email_confirmation_key),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }

    async fn find_one(
        &self,
        filter: impl sea_orm::sea_query::IntoCondition + Send,
    ) -> Result<Option<User>, UserRepositoryError> {
        let model = UserEntity::find()
            .filter(filter)
            .one(&*self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model.map(Self::to_domain))
    }
}

fn map_db_error(e: DbErr) -> UserRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return UserRepositoryError::UserAlreadyExists;
    }
    UserRepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    /// Inserts a new row or overwrites the row with the same id.
    async fn save(&self, user: User) -> Result<User, UserRepositoryError> {
        let exists = UserEntity::find_by_id(user.id)
            .one(&*self.db)
            .await
            .map_err(map_db_error)?
            .is_some();

        let active = Self::to_active_model(user);
        let result = if exists {
            active.update(&*self.db).await
        } else {
            active.insert(&*self.db).await
        };
        let stored = result.map_err(map_db_error)?;

        Ok(Self::to_domain(stored))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let model = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model.map(Self::to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        self.find_one(UserColumn::Email.eq(email)).await
    }

    async fn find_by_confirmation_key(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        self.find_one(UserColumn::EmailConfirmationKey.eq(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::tests::support::fixtures::{confirmed_user, unconfirmed_user_with_key, TEST_EMAIL};

    fn model_of(user: &User) -> UserModel {
        UserModel {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            email_confirmed: user.email_confirmed,
            email_confirmation_key: user.email_confirmation_key.clone(),
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }

    fn repo(db: MockDatabase) -> UserRepositoryPostgres {
        UserRepositoryPostgres::new(Arc::new(db.into_connection()))
    }

    #[tokio::test]
    async fn save_inserts_unknown_user() {
        let user = unconfirmed_user_with_key("key-1");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<UserModel>::new()])
            .append_query_results([vec![model_of(&user)]]);

        let saved = repo(db).save(user.clone()).await.unwrap();

        assert_eq!(saved.id, user.id);
        assert_eq!(saved.email, TEST_EMAIL);
        assert_eq!(saved.email_confirmation_key.as_deref(), Some("key-1"));
        assert!(!saved.email_confirmed);
    }

    #[tokio::test]
    async fn save_updates_existing_user() {
        let before = unconfirmed_user_with_key("key-1");
        let mut after = before.clone();
        after.confirm_email();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model_of(&before)]])
            .append_query_results([vec![model_of(&after)]]);

        let saved = repo(db).save(after).await.unwrap();

        assert!(saved.email_confirmed);
        assert!(saved.email_confirmation_key.is_none());
    }

    #[tokio::test]
    async fn unique_violation_maps_to_already_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<UserModel>::new()])
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint".to_string(),
            )]);

        let result = repo(db).save(confirmed_user()).await;

        assert!(matches!(result, Err(UserRepositoryError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn other_failures_are_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())]);

        match repo(db).find_by_email(TEST_EMAIL).await {
            Err(UserRepositoryError::DatabaseError(msg)) => {
                assert!(msg.contains("connection timeout"))
            }
            other => panic!("Expected DatabaseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn lookups_map_rows_to_domain() {
        let user = confirmed_user();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model_of(&user)]])
            .append_query_results([Vec::<UserModel>::new()])
            .append_query_results([vec![model_of(&user)]]);
        let repo = repo(db);

        let by_email = repo.find_by_email(TEST_EMAIL).await.unwrap().unwrap();
        let by_key = repo.find_by_confirmation_key("nope").await.unwrap();
        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();

        assert_eq!(by_email.username.as_deref(), Some("test"));
        assert!(by_email.email_confirmed);
        assert!(by_key.is_none());
        assert_eq!(by_id.id, user.id);
    }

    #[test]
    fn timestamps_survive_conversion() {
        let at: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        let user = User::builder(TEST_EMAIL)
            .created_at(at)
            .updated_at(at)
            .build();

        let back = UserRepositoryPostgres::to_domain(model_of(&user));

        assert_eq!(back.created_at, at);
        assert_eq!(back, user);
    }
}
