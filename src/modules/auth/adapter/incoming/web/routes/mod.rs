mod dto;
mod error_response;
mod login_user;
mod logout_user;
mod refresh_token;
mod register_user;
mod send_verify_code;
mod verify_email;

pub use dto::{MessageResponse, UserView};
pub use login_user::{login_user_handler, LoginRequestDto, LoginResponse};
pub use logout_user::{logout_user_handler, LogoutDto};
pub use refresh_token::{refresh_token_handler, RefreshTokenDto, RefreshTokenResponse};
pub use register_user::{register_user_handler, RegisterUserDto, RegisterUserResponse};
pub use send_verify_code::{send_verify_code_handler, SendVerifyCodeDto};
pub use verify_email::{verify_user_email_handler, VerifyEmailDto};

// utoipa path structs, collected by the OpenAPI document
pub use login_user::__path_login_user_handler;
pub use logout_user::__path_logout_user_handler;
pub use refresh_token::__path_refresh_token_handler;
pub use register_user::__path_register_user_handler;
pub use send_verify_code::__path_send_verify_code_handler;
pub use verify_email::__path_verify_user_email_handler;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_user_handler)
        .service(verify_user_email_handler)
        .service(send_verify_code_handler)
        .service(login_user_handler)
        .service(refresh_token_handler)
        .service(logout_user_handler);
}
