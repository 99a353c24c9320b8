use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::refresh_token::RefreshTokenRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::error_response::auth_error_response;

#[derive(Deserialize, ToSchema)]
pub struct RefreshTokenDto {
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")]
    pub refresh_token: String,
}

#[derive(Serialize, ToSchema)]
pub struct RefreshTokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    access_token: String,

    /// Replaces the presented token, which is now dead
    #[schema(example = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae")]
    refresh_token: String,

    /// Expiry of the new refresh token
    expiry_time: DateTime<Utc>,
}

/// Rotate a refresh token
///
/// Exchanges a live refresh token for a new access token and a new refresh token.
/// Every refresh token the user held before becomes invalid.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "Token rotated", body = inline(SuccessResponse<RefreshTokenResponse>)),
        (
            status = 400,
            description = "Empty or unknown refresh token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_ARGUMENT",
                    "message": "Unknown refresh token"
                }
            })
        ),
        (status = 410, description = "Refresh token has expired", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/refresh")]
pub async fn refresh_token_handler(
    req: web::Json<RefreshTokenDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let request = match RefreshTokenRequest::new(req.into_inner().refresh_token) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("INVALID_ARGUMENT", &e.to_string()),
    };

    match data.refresh_token_use_case.execute(request).await {
        Ok(output) => {
            info!("Refresh token exchanged");
            ApiResponse::success(RefreshTokenResponse {
                access_token: output.access_token,
                refresh_token: output.refresh_token,
                expiry_time: output.expiry_time,
            })
        }
        Err(e) => auth_error_response("refresh_token", &e),
    }
}
