use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::OpenApi;

use crate::auth::adapter::incoming::web::routes::{
    LoginRequestDto, LoginResponse, LogoutDto, MessageResponse, RefreshTokenDto,
    RefreshTokenResponse, RegisterUserDto, RegisterUserResponse, SendVerifyCodeDto, UserView,
    VerifyEmailDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth Service API",
        version = "1.0.0",
        description = "Account registration, email verification and token sessions"
    ),
    paths(
        crate::auth::adapter::incoming::web::routes::register_user_handler,
        crate::auth::adapter::incoming::web::routes::verify_user_email_handler,
        crate::auth::adapter::incoming::web::routes::send_verify_code_handler,
        crate::auth::adapter::incoming::web::routes::login_user_handler,
        crate::auth::adapter::incoming::web::routes::refresh_token_handler,
        crate::auth::adapter::incoming::web::routes::logout_user_handler,
    ),
    components(
        schemas(
            // Response wrappers
            SuccessResponse<RegisterUserResponse>,
            ErrorResponse,
            ErrorDetail,

            // Auth DTOs
            RegisterUserDto,
            RegisterUserResponse,
            UserView,
            VerifyEmailDto,
            SendVerifyCodeDto,
            MessageResponse,
            LoginRequestDto,
            LoginResponse,
            RefreshTokenDto,
            RefreshTokenResponse,
            LogoutDto,
        )
    ),
    tags(
        (name = "auth", description = "Account lifecycle endpoints"),
    )
)]
pub struct ApiDoc;
