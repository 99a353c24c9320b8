use std::fmt;

/// Stable classification of every failure the account lifecycle can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Unauthenticated,
    DeadlineExceeded,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    DeadlineExceeded(String),

    #[error("{operation} failed: {message}")]
    Internal {
        operation: &'static str,
        message: String,
    },
}

impl AuthError {
    pub const INVALID_CREDENTIALS: &'static str = "Invalid credentials";

    /// Wrap a collaborator failure, keeping the operation name for logs.
    pub fn internal(operation: &'static str, source: impl fmt::Display) -> Self {
        AuthError::Internal {
            operation,
            message: source.to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        AuthError::Unauthenticated(Self::INVALID_CREDENTIALS.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::InvalidInput,
            AuthError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            AuthError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AuthError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            AuthError::Internal { .. } => ErrorKind::Internal,
        }
    }
}
