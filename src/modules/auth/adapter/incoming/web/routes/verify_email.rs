use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::verify_user_email::VerifyEmailRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use super::dto::MessageResponse;
use super::error_response::auth_error_response;

#[derive(Deserialize, ToSchema)]
pub struct VerifyEmailDto {
    /// Email or username
    #[schema(example = "john@example.com")]
    pub identifier: String,

    /// The 4-digit code from the verification email
    #[schema(example = 4821)]
    pub code: i32,
}

/// Verify an email address
///
/// Checks run in order: account exists, not yet verified, code not expired, code matches.
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = "auth",
    request_body = VerifyEmailDto,
    responses(
        (status = 200, description = "Email verified", body = inline(SuccessResponse<MessageResponse>)),
        (status = 401, description = "Code does not match", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse),
        (status = 409, description = "Account already verified", body = ErrorResponse),
        (
            status = 410,
            description = "Code has expired",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "DEADLINE_EXCEEDED",
                    "message": "Verification code has expired"
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/verify-email")]
pub async fn verify_user_email_handler(
    req: web::Json<VerifyEmailDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = VerifyEmailRequest::new(dto.identifier, dto.code);

    match data.verify_email_use_case.execute(request).await {
        Ok(output) => {
            info!("Email verification succeeded");
            ApiResponse::success(MessageResponse {
                success: output.success,
                message: output.message,
            })
        }
        Err(e) => auth_error_response("verify_email", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::errors::AuthError;
    use crate::auth::application::use_cases::verify_user_email::VerifyEmailOutput;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::stubs::StubVerifyEmailUseCase;
    use actix_web::{test, App};
    use serde_json::json;

    async fn call(stub: StubVerifyEmailUseCase, body: serde_json::Value) -> (u16, serde_json::Value) {
        let app_state = TestAppStateBuilder::default()
            .with_verify_email(stub)
            .build();
        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .service(verify_user_email_handler),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/verify-email")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        (status, test::read_body_json(resp).await)
    }

    fn valid_body() -> serde_json::Value {
        json!({ "identifier": "john@example.com", "code": 4821 })
    }

    #[actix_web::test]
    async fn test_verify_email_success() {
        let (status, body) = call(
            StubVerifyEmailUseCase::ok(VerifyEmailOutput {
                success: true,
                message: "Email verified successfully".into(),
            }),
            valid_body(),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["data"]["success"], true);
        assert_eq!(body["data"]["message"], "Email verified successfully");
    }

    #[actix_web::test]
    async fn test_verify_email_error_statuses() {
        let cases = [
            (AuthError::NotFound, 404),
            (AuthError::AlreadyExists("Email already verified".into()), 409),
            (AuthError::DeadlineExceeded("Verification code has expired".into()), 410),
            (AuthError::Unauthenticated("Invalid verification code".into()), 401),
        ];

        for (err, expected) in cases {
            let (status, body) = call(StubVerifyEmailUseCase::err(err), valid_body()).await;
            assert_eq!(status, expected);
            assert_eq!(body["success"], false);
        }
    }

    #[actix_web::test]
    async fn test_verify_email_non_numeric_code_is_rejected() {
        let app_state = TestAppStateBuilder::default().build();
        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(crate::shared::api::custom_json_config())
                .service(verify_user_email_handler),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/verify-email")
            .set_json(json!({ "identifier": "john@example.com", "code": "abcd" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
