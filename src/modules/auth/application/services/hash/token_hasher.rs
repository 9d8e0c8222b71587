use sha2::{Digest, Sha256};

/// SHA-256 hex digest of an opaque token. Stores key records by digest so
/// raw token values never reach storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
