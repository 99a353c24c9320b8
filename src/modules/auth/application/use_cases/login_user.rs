use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::application::domain::entities::{PublicUser, RefreshToken};
use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::domain::policies::LifecyclePolicy;
use crate::auth::application::ports::outgoing::{AccountStore, PasswordHasher, TokenProvider};

// ============================ Login Request ==================================
#[derive(Clone)]
pub struct LoginRequest {
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginRequestError {
    EmptyIdentifier,
    EmptyPassword,
}

impl fmt::Display for LoginRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginRequestError::EmptyIdentifier => write!(f, "Email or username is required"),
            LoginRequestError::EmptyPassword => write!(f, "Password is required"),
        }
    }
}

impl std::error::Error for LoginRequestError {}

impl From<LoginRequestError> for AuthError {
    fn from(error: LoginRequestError) -> Self {
        AuthError::InvalidInput(error.to_string())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    pub fn new(identifier: String, password: String) -> Result<Self, LoginRequestError> {
        let identifier = identifier.trim().to_string();
        if identifier.is_empty() {
            return Err(LoginRequestError::EmptyIdentifier);
        }
        if password.is_empty() {
            return Err(LoginRequestError::EmptyPassword);
        }
        Ok(Self {
            identifier,
            password,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ============================ Login Output ===================================
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

// ============================ Login Use Case =================================
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<LoginOutput, AuthError>;
}

#[derive(Clone)]
pub struct LoginUserUseCase {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
    policy: LifecyclePolicy,
}

impl LoginUserUseCase {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            policy,
        }
    }
}

#[async_trait]
impl ILoginUserUseCase for LoginUserUseCase {
    async fn execute(&self, request: LoginRequest) -> Result<LoginOutput, AuthError> {
        // Unknown identifier and wrong password are indistinguishable to the caller
        let user = match self
            .store
            .find_user_by_identifier(request.identifier())
            .await
            .map_err(|e| AuthError::internal("login", e))?
        {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown identifier");
                return Err(AuthError::invalid_credentials());
            }
        };

        let password_ok = self
            .hasher
            .verify_password(request.password(), &user.password_hash)
            .await
            .map_err(|e| AuthError::internal("login", e))?;

        if !password_ok {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::invalid_credentials());
        }

        let access_token = self
            .tokens
            .sign_access_token(user.id, self.policy.access_token_ttl)
            .map_err(|e| AuthError::internal("login", e))?;

        let refresh_token = RefreshToken::issue(
            self.tokens
                .generate_refresh_token()
                .map_err(|e| AuthError::internal("login", e))?,
            user.id,
            self.policy.refresh_token_ttl,
        );

        self.store
            .replace_refresh_tokens_for_user(user.id, &refresh_token)
            .await
            .map_err(|e| AuthError::internal("login", e))?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput {
            user: user.to_public(false),
            access_token,
            refresh_token: refresh_token.token,
        })
    }
}
