use chrono::Duration;

use crate::config::{env_or, ConfigError};

/// Tunables of the account lifecycle. Timing values are configuration, not protocol.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    pub min_username_len: usize,
    pub verification_code_ttl: Duration,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Echo the outstanding code in the registration response (debug/test only).
    pub expose_verification_code: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            min_username_len: Self::DEFAULT_MIN_USERNAME_LEN,
            verification_code_ttl: Duration::seconds(Self::DEFAULT_VERIFICATION_CODE_TTL_SECS),
            access_token_ttl: Duration::seconds(Self::DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl: Duration::seconds(Self::DEFAULT_REFRESH_TOKEN_TTL_SECS),
            expose_verification_code: false,
        }
    }
}

impl LifecyclePolicy {
    pub const DEFAULT_MIN_USERNAME_LEN: usize = 5;
    pub const DEFAULT_VERIFICATION_CODE_TTL_SECS: i64 = 15 * 60;
    pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
    pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    /// Load the policy from the environment, falling back to defaults for unset keys.
    ///
    /// `EXPOSE_VERIFICATION_CODE=true` is refused when `production` is set.
    pub fn from_env(production: bool) -> Result<Self, ConfigError> {
        let min_username_len = env_or("MIN_USERNAME_LEN", Self::DEFAULT_MIN_USERNAME_LEN)?;
        let verification_code_ttl = positive_seconds(
            "VERIFICATION_CODE_TTL_SECONDS",
            Self::DEFAULT_VERIFICATION_CODE_TTL_SECS,
        )?;
        let access_token_ttl =
            positive_seconds("ACCESS_TOKEN_TTL_SECONDS", Self::DEFAULT_ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token_ttl = positive_seconds(
            "REFRESH_TOKEN_TTL_SECONDS",
            Self::DEFAULT_REFRESH_TOKEN_TTL_SECS,
        )?;

        if refresh_token_ttl <= access_token_ttl {
            return Err(ConfigError::Invalid {
                key: "REFRESH_TOKEN_TTL_SECONDS",
                reason: "must be greater than ACCESS_TOKEN_TTL_SECONDS".to_string(),
            });
        }

        let expose_verification_code = env_or("EXPOSE_VERIFICATION_CODE", false)?;
        if expose_verification_code && production {
            return Err(ConfigError::Invalid {
                key: "EXPOSE_VERIFICATION_CODE",
                reason: "cannot be enabled in production".to_string(),
            });
        }

        Ok(Self {
            min_username_len,
            verification_code_ttl,
            access_token_ttl,
            refresh_token_ttl,
            expose_verification_code,
        })
    }

    pub fn with_expose_verification_code(mut self, expose: bool) -> Self {
        self.expose_verification_code = expose;
        self
    }
}

fn positive_seconds(key: &'static str, default: i64) -> Result<Duration, ConfigError> {
    let seconds: i64 = env_or(key, default)?;
    if seconds <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be a positive number of seconds".to_string(),
        });
    }
    Ok(Duration::seconds(seconds))
}
