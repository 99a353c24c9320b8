use sha2::{Digest, Sha256};

/// SHA-256 of a refresh token, lowercase hex. This is the at-rest key for
/// refresh tokens in both Postgres and the cache.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
