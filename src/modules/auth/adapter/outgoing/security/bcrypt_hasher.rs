use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::auth::application::ports::outgoing::password_hasher::{HashError, PasswordHasher};

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt with a configurable work factor, for deployments that already
/// hold `$2b$` hashes.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(password, cost).map_err(|_| HashError::HashFailed))
            .await
            .map_err(|_| HashError::TaskFailed)?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError> {
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || {
            verify(password, &hashed).map_err(|_| HashError::VerifyFailed)
        })
        .await
        .map_err(|_| HashError::TaskFailed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify() {
        let hasher = BcryptHasher::with_cost(MIN_COST);

        let hashed = hasher.hash_password("hcshcs").await.unwrap();

        assert_ne!(hashed, "hcshcs");
        assert!(hasher.verify_password("hcshcs", &hashed).await.unwrap());
        assert!(!hasher.verify_password("wrong", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_hash_is_verify_error() {
        let hasher = BcryptHasher::with_cost(MIN_COST);

        let result = hasher.verify_password("hcshcs", "invalid-hash").await;

        assert!(matches!(result, Err(HashError::VerifyFailed)));
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(BcryptHasher::with_cost(1).cost(), MIN_COST);
        assert_eq!(BcryptHasher::with_cost(99).cost(), MAX_COST);
        assert_eq!(BcryptHasher::default().cost(), DEFAULT_COST);
    }
}
