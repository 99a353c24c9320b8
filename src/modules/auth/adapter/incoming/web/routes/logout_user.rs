use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::logout_user::LogoutRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::dto::MessageResponse;
use super::error_response::auth_error_response;

#[derive(Deserialize, ToSchema)]
pub struct LogoutDto {
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")]
    pub refresh_token: String,
}

/// Logout
///
/// Revokes the presented refresh token. Succeeds even if the token is unknown.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    request_body = LogoutDto,
    responses(
        (
            status = 200,
            description = "Logged out",
            body = inline(SuccessResponse<MessageResponse>),
            example = json!({
                "success": true,
                "data": {
                    "success": true,
                    "message": "Logged out successfully"
                }
            })
        ),
        (status = 400, description = "Empty refresh token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/logout")]
pub async fn logout_user_handler(
    req: web::Json<LogoutDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let request = match LogoutRequest::new(req.into_inner().refresh_token) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("INVALID_ARGUMENT", &e.to_string()),
    };

    match data.logout_use_case.execute(request).await {
        Ok(output) => ApiResponse::success(MessageResponse {
            success: output.success,
            message: output.message,
        }),
        Err(e) => auth_error_response("logout", &e),
    }
}
