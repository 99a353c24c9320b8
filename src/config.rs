use std::env;
use std::fmt;
use std::str::FromStr;

use crate::auth::adapter::outgoing::jwt::JwtConfig;
use crate::auth::application::domain::policies::LifecyclePolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Read `key`, falling back to `default` when unset or blank.
pub fn env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}

pub fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Test,
    Production,
}

impl RuntimeEnv {
    pub fn current() -> Self {
        env::var("RUST_ENV")
            .map(|v| Self::from_name(&v))
            .unwrap_or(RuntimeEnv::Development)
    }

    fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeEnv::Production,
            "test" => RuntimeEnv::Test,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeEnv::Development => "development",
            RuntimeEnv::Test => "test",
            RuntimeEnv::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

/// Try `.env.{RUST_ENV}` first, then fall back to `.env`.
pub fn load_env_files() -> RuntimeEnv {
    let runtime = RuntimeEnv::current();
    let env_file = format!(".env.{}", runtime.as_str());
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }
    // The env file may itself set RUST_ENV
    RuntimeEnv::current()
}

#[derive(Clone)]
pub enum MailConfig {
    /// Unauthenticated local relay such as Mailpit.
    Local {
        host: String,
        port: u16,
        from_email: String,
    },
    Relay {
        server: String,
        username: String,
        password: String,
        from_email: String,
    },
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailConfig::Local {
                host,
                port,
                from_email,
            } => f
                .debug_struct("Local")
                .field("host", host)
                .field("port", port)
                .field("from_email", from_email)
                .finish(),
            MailConfig::Relay {
                server, from_email, ..
            } => f
                .debug_struct("Relay")
                .field("server", server)
                .field("from_email", from_email)
                .finish_non_exhaustive(),
        }
    }
}

impl MailConfig {
    fn from_env(runtime: RuntimeEnv) -> Result<Self, ConfigError> {
        let from_email = required("EMAIL_FROM")?;

        if runtime == RuntimeEnv::Test {
            return Ok(MailConfig::Local {
                host: env_or("SMTP_HOST", "localhost".to_string())?,
                port: env_or("SMTP_PORT", 1025u16)?,
                from_email,
            });
        }

        Ok(MailConfig::Relay {
            server: required("SMTP_SERVER")?,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            from_email,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub runtime: RuntimeEnv,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub mail: MailConfig,
    pub bcrypt_cost: u32,
    pub jwt: JwtConfig,
    pub policy: LifecyclePolicy,
}

impl AppConfig {
    pub fn from_env(runtime: RuntimeEnv) -> Result<Self, ConfigError> {
        let default_cost = if runtime.is_production() {
            bcrypt::DEFAULT_COST
        } else {
            4
        };
        let bcrypt_cost: u32 = env_or("BCRYPT_COST", default_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("{} is outside 4..=31", bcrypt_cost),
            });
        }

        Ok(Self {
            runtime,
            host: env_or("HOST", "127.0.0.1".to_string())?,
            port: env_or("PORT", 8080u16)?,
            database_url: required("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            mail: MailConfig::from_env(runtime)?,
            bcrypt_cost,
            jwt: JwtConfig::from_env()?,
            policy: LifecyclePolicy::from_env(runtime.is_production())?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
