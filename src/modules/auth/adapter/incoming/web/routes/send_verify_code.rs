use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::send_verify_code::SendVerifyCodeRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::dto::MessageResponse;
use super::error_response::auth_error_response;

#[derive(Deserialize, ToSchema)]
pub struct SendVerifyCodeDto {
    /// Email or username
    #[schema(example = "johndoe")]
    pub identifier: String,
}

/// Resend the verification code
///
/// Replaces any outstanding code and restarts its validity window.
/// Already verified accounts get a success response and no email.
#[utoipa::path(
    post,
    path = "/api/auth/verification-code",
    tag = "auth",
    request_body = SendVerifyCodeDto,
    responses(
        (status = 200, description = "Code sent, or account already verified", body = inline(SuccessResponse<MessageResponse>)),
        (status = 404, description = "No such account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/verification-code")]
pub async fn send_verify_code_handler(
    req: web::Json<SendVerifyCodeDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let request = SendVerifyCodeRequest::new(req.into_inner().identifier);

    match data.send_verify_code_use_case.execute(request).await {
        Ok(output) => ApiResponse::success(MessageResponse {
            success: output.success,
            message: output.message,
        }),
        Err(e) => auth_error_response("send_verify_code", &e),
    }
}
