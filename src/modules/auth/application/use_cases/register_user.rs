use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use email_address::EmailAddress;
use serde::Serialize;
use tracing::info;

use crate::auth::application::domain::entities::{NewUser, PublicUser};
use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::domain::policies::LifecyclePolicy;
use crate::auth::application::ports::outgoing::{
    AccountStore, AccountStoreError, PasswordHasher, VerificationCodeGenerator,
};
use crate::email::application::ports::outgoing::VerificationCodeNotifier;

// ========================= Register User Request =========================
/// Validated registration input. Email is trimmed and lower-cased.
#[derive(Clone)]
pub struct RegisterUserRequest {
    email: String,
    password: String,
    username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterUserRequestError {
    InvalidEmail(String),
    EmptyPassword,
    EmptyUsername,
    UsernameContainsAt,
}

impl fmt::Display for RegisterUserRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterUserRequestError::InvalidEmail(email) => {
                write!(f, "Invalid email address: {}", email)
            }
            RegisterUserRequestError::EmptyPassword => write!(f, "Password cannot be empty"),
            RegisterUserRequestError::EmptyUsername => write!(f, "Username cannot be empty"),
            RegisterUserRequestError::UsernameContainsAt => {
                write!(f, "Username cannot contain '@'")
            }
        }
    }
}

impl std::error::Error for RegisterUserRequestError {}

impl From<RegisterUserRequestError> for AuthError {
    fn from(error: RegisterUserRequestError) -> Self {
        AuthError::InvalidInput(error.to_string())
    }
}

impl fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RegisterUserRequest {
    pub fn new(
        email: String,
        password: String,
        username: String,
    ) -> Result<Self, RegisterUserRequestError> {
        let email = email.trim().to_lowercase();
        if !EmailAddress::is_valid(&email) {
            return Err(RegisterUserRequestError::InvalidEmail(email));
        }

        if password.is_empty() {
            return Err(RegisterUserRequestError::EmptyPassword);
        }

        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(RegisterUserRequestError::EmptyUsername);
        }
        // Identifiers with '@' resolve to emails only
        if username.contains('@') {
            return Err(RegisterUserRequestError::UsernameContainsAt);
        }

        Ok(Self {
            email,
            password,
            username,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

// ============================ Register User Output =========================
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserOutput {
    pub user: PublicUser,
    pub message: String,
}

// ============================ Register User Use Case =======================
#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(&self, request: RegisterUserRequest)
        -> Result<RegisterUserOutput, AuthError>;
}

#[derive(Clone)]
pub struct RegisterUserUseCase {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    codes: Arc<dyn VerificationCodeGenerator>,
    notifier: Arc<dyn VerificationCodeNotifier>,
    policy: LifecyclePolicy,
}

impl RegisterUserUseCase {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        codes: Arc<dyn VerificationCodeGenerator>,
        notifier: Arc<dyn VerificationCodeNotifier>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            store,
            hasher,
            codes,
            notifier,
            policy,
        }
    }
}

#[async_trait]
impl IRegisterUserUseCase for RegisterUserUseCase {
    async fn execute(
        &self,
        request: RegisterUserRequest,
    ) -> Result<RegisterUserOutput, AuthError> {
        if request.username().chars().count() < self.policy.min_username_len {
            return Err(AuthError::InvalidInput(format!(
                "Username must be at least {} characters",
                self.policy.min_username_len
            )));
        }

        let password_hash = self
            .hasher
            .hash_password(request.password())
            .await
            .map_err(|e| AuthError::internal("register", e))?;

        let code = self.codes.next();
        let expires_at = Utc::now() + self.policy.verification_code_ttl;

        let user = self
            .store
            .create_user(NewUser {
                email: request.email().to_string(),
                username: request.username().to_string(),
                password_hash,
                verification_code: code,
                verification_expire_time: expires_at,
            })
            .await
            .map_err(|e| match e {
                AccountStoreError::Duplicate => {
                    AuthError::AlreadyExists("Account already exists".to_string())
                }
                other => AuthError::internal("register", other),
            })?;

        info!(user_id = %user.id, "User registered, verification pending");

        // The user row stays even if delivery fails; a resend recovers it.
        self.notifier
            .send_verification_code(&user.email, &user.username, code)
            .await
            .map_err(|e| AuthError::internal("register", e))?;

        Ok(RegisterUserOutput {
            user: user.to_public(self.policy.expose_verification_code),
            message: "User created successfully. Please check your email for the verification code."
                .to_string(),
        })
    }
}
