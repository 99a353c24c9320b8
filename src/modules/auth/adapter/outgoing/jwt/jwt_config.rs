use std::env;
use std::fmt;

use crate::config::{env_or, required, ConfigError};

#[derive(Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    /// Clock skew tolerated when checking `exp` and `nbf`, in seconds.
    pub leeway: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl JwtConfig {
    pub const MIN_SECRET_LEN: usize = 32;
    pub const DEFAULT_ISSUER: &'static str = "auth-service";
    pub const DEFAULT_LEEWAY_SECS: u64 = 30;

    /// Load JWT configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = required("JWT_SECRET")?;

        // HS256 requires at least 32 bytes of key material
        if secret_key.len() < Self::MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!(
                    "must be at least {} characters long for HS256",
                    Self::MIN_SECRET_LEN
                ),
            });
        }

        let issuer = env::var("JWT_ISSUER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_ISSUER.to_string());
        let leeway = env_or("JWT_LEEWAY_SECONDS", Self::DEFAULT_LEEWAY_SECS)?;

        Ok(Self {
            secret_key,
            issuer,
            leeway,
        })
    }
}
