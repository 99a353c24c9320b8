use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

use crate::auth::application::ports::outgoing::password_hasher::{HashError, PasswordHasher};

/// bcrypt on the blocking pool; the work factor would otherwise stall the executor.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
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

        tokio::task::spawn_blocking(move || {
            hash(password, cost).map_err(|e| HashError::HashFailed(e.to_string()))
        })
        .await
        .map_err(|_| HashError::TaskFailed)?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError> {
        let password = password.to_string();
        let hashed = hashed.to_string();

        tokio::task::spawn_blocking(move || match verify(password, &hashed) {
            Ok(matches) => Ok(matches),
            Err(BcryptError::InvalidHash(_)) | Err(BcryptError::InvalidPrefix(_)) => {
                Err(HashError::VerifyFailed("stored hash is not a bcrypt hash".into()))
            }
            Err(e) => Err(HashError::VerifyFailed(e.to_string())),
        })
        .await
        .map_err(|_| HashError::TaskFailed)?
    }
}
