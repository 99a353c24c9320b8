use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::auth::application::domain::errors::AuthError;
use crate::shared::api::ApiResponse;

/// Render an `AuthError` into the JSON envelope with its fixed status.
///
/// `Internal` details are logged here and replaced by a generic message.
pub(super) fn auth_error_response(operation: &str, err: &AuthError) -> HttpResponse {
    let code = err.kind().code();
    let message = err.to_string();

    match err {
        AuthError::InvalidInput(_) | AuthError::InvalidArgument(_) => {
            warn!(operation, code, %message, "Request rejected");
            ApiResponse::bad_request(code, &message)
        }
        AuthError::NotFound => {
            warn!(operation, code, "Account not found");
            ApiResponse::not_found(code, &message)
        }
        AuthError::AlreadyExists(_) => {
            warn!(operation, code, %message, "Conflict");
            ApiResponse::conflict(code, &message)
        }
        AuthError::Unauthenticated(_) => {
            warn!(operation, code, "Authentication failed");
            ApiResponse::unauthorized(code, &message)
        }
        AuthError::DeadlineExceeded(_) => {
            warn!(operation, code, %message, "Expired credential presented");
            ApiResponse::gone(code, &message)
        }
        AuthError::Internal { .. } => {
            error!(operation, error = %message, "Internal failure");
            ApiResponse::internal_error()
        }
    }
}
