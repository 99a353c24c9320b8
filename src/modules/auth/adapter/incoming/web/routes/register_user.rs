use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::register_user::RegisterUserRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::dto::UserView;
use super::error_response::auth_error_response;

/// Request body for user registration
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RegisterUserDto {
    /// Email address
    #[schema(example = "john@example.com")]
    pub email: String,

    /// Password
    #[schema(example = "SecurePass123!")]
    pub password: String,

    /// Username (at least 5 characters)
    #[schema(example = "johndoe")]
    pub username: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterUserResponse {
    /// Created account, still unverified
    user: UserView,

    #[schema(example = "Registration successful. Check your email for the verification code.")]
    message: String,
}

/// Register a new account
///
/// Creates an unverified account and emails a 4-digit verification code.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterUserDto,
    responses(
        (
            status = 201,
            description = "Account created",
            body = inline(SuccessResponse<RegisterUserResponse>)
        ),
        (
            status = 400,
            description = "Invalid email, empty password, or username too short",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_INPUT",
                    "message": "Username must be at least 5 characters"
                }
            })
        ),
        (
            status = 409,
            description = "Email or username already taken",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "ALREADY_EXISTS",
                    "message": "Account already exists"
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/register")]
pub async fn register_user_handler(
    req: web::Json<RegisterUserDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();

    info!(username = %dto.username, "Registration attempt");

    let request = match RegisterUserRequest::new(dto.email, dto.password, dto.username) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid registration input");
            return ApiResponse::bad_request("INVALID_INPUT", &e.to_string());
        }
    };

    match data.register_user_use_case.execute(request).await {
        Ok(output) => {
            info!(user_id = %output.user.id, "User registered");
            ApiResponse::created(RegisterUserResponse {
                user: output.user.into(),
                message: output.message,
            })
        }
        Err(e) => auth_error_response("register", &e),
    }
}
