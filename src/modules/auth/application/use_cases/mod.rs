pub mod login_user;
pub mod logout_user;
pub mod refresh_token;
pub mod register_user;
pub mod send_verify_code;
pub mod verify_user_email;
