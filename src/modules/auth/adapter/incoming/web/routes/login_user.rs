use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::login_user::LoginRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::dto::UserView;
use super::error_response::auth_error_response;

/// Login request from client
#[derive(Deserialize, ToSchema)]
pub struct LoginRequestDto {
    /// Email or username
    #[schema(example = "john@example.com")]
    pub identifier: String,

    /// Password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Authenticated user information
    user: UserView,

    /// JWT access token (short-lived)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    access_token: String,

    /// Opaque refresh token (single use)
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")]
    refresh_token: String,
}

/// User login
///
/// Authenticates with email or username and password. Returns an access token and a
/// refresh token; any earlier refresh token of the user stops working.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (
            status = 200,
            description = "Login successful",
            body = inline(SuccessResponse<LoginResponse>)
        ),
        (
            status = 401,
            description = "Invalid credentials",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "UNAUTHENTICATED",
                    "message": "Invalid credentials"
                }
            })
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INTERNAL_ERROR",
                    "message": "An unexpected error occurred"
                }
            })
        ),
    )
)]
#[post("/api/auth/login")]
pub async fn login_user_handler(
    req: web::Json<LoginRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();

    let request = match LoginRequest::new(dto.identifier, dto.password) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "Invalid login input");
            return ApiResponse::bad_request("INVALID_INPUT", &e.to_string());
        }
    };

    match data.login_user_use_case.execute(request).await {
        Ok(output) => {
            info!(user_id = %output.user.id, "User logged in successfully");

            ApiResponse::success(LoginResponse {
                user: output.user.into(),
                access_token: output.access_token,
                refresh_token: output.refresh_token,
            })
        }
        Err(e) => auth_error_response("login", &e),
    }
}
