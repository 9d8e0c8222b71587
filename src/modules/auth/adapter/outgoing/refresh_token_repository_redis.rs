use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{redis::AsyncCommands, Pool};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::application::domain::entities::RefreshToken;
use crate::auth::application::ports::outgoing::refresh_token_repository::{
    RefreshTokenRepository, RefreshTokenRepositoryError,
};
use crate::auth::application::services::hash::hash_token;

/// Redis-backed refresh token store.
///
/// One key per live token:
/// ```text
/// auth:refresh:token:{sha256(token_value)} -> {"id":..,"user_id":..,"issued_at":..,"expires_at":..}
/// ```
/// The TTL equals the remaining lifetime, so Redis drops expired sessions on
/// its own. Only the digest of the token value is ever written.
#[derive(Clone)]
pub struct RedisRefreshTokenRepository {
    pool: Arc<Pool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRefreshToken {
    id: Uuid,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl StoredRefreshToken {
    fn from_domain(token: &RefreshToken) -> Self {
        Self {
            id: token.id,
            user_id: token.user_id,
            issued_at: token.issued_at,
            expires_at: token.expires_at,
        }
    }

    fn into_domain(self, token_value: &str) -> RefreshToken {
        RefreshToken {
            id: self.id,
            token_value: token_value.to_string(),
            user_id: self.user_id,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
        }
    }
}

fn db_error(e: impl std::fmt::Display) -> RefreshTokenRepositoryError {
    RefreshTokenRepositoryError::DatabaseError(e.to_string())
}

impl RedisRefreshTokenRepository {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn token_key(token_value: &str) -> String {
        format!("auth:refresh:token:{}", hash_token(token_value))
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, RefreshTokenRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|e| db_error(format!("Pool error: {e}")))
    }
}

#[async_trait]
impl RefreshTokenRepository for RedisRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        let ttl = (token.expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            return Err(RefreshTokenRepositoryError::TokenExpired);
        }

        let payload =
            serde_json::to_string(&StoredRefreshToken::from_domain(&token)).map_err(db_error)?;
        let mut conn = self.get_conn().await?;

        // SET .. NX answers nil when the key is already taken.
        let stored: Option<String> = deadpool_redis::redis::cmd("SET")
            .arg(Self::token_key(&token.token_value))
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut *conn)
            .await
            .map_err(db_error)?;

        match stored {
            Some(_) => Ok(()),
            None => Err(RefreshTokenRepositoryError::TokenAlreadyExists),
        }
    }

    async fn find_by_token_value(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError> {
        let mut conn = self.get_conn().await?;

        let payload: Option<String> = conn
            .get(Self::token_key(token_value))
            .await
            .map_err(db_error)?;

        payload
            .map(|raw| {
                serde_json::from_str::<StoredRefreshToken>(&raw)
                    .map(|stored| stored.into_domain(token_value))
                    .map_err(db_error)
            })
            .transpose()
    }

    async fn delete(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.get_conn().await?;

        let _removed: u64 = conn
            .del(Self::token_key(&token.token_value))
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
