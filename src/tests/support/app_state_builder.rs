use crate::auth::application::use_cases::{
    login_user::ILoginUserUseCase, logout_user::ILogoutUseCase,
    refresh_token::IRefreshTokenUseCase, register_user::IRegisterUserUseCase,
    send_verify_code::ISendVerifyCodeUseCase, verify_user_email::IVerifyUserEmailUseCase,
};
use crate::tests::support::stubs::*;
use crate::AppState;
use actix_web::web;
use std::sync::Arc;

/// Every use case not set explicitly answers with an internal error.
#[derive(Default)]
pub struct TestAppStateBuilder {
    register_user: Option<Arc<dyn IRegisterUserUseCase>>,
    verify_email: Option<Arc<dyn IVerifyUserEmailUseCase>>,
    send_verify_code: Option<Arc<dyn ISendVerifyCodeUseCase>>,
    login_user: Option<Arc<dyn ILoginUserUseCase>>,
    refresh_token: Option<Arc<dyn IRefreshTokenUseCase>>,
    logout: Option<Arc<dyn ILogoutUseCase>>,
}

impl TestAppStateBuilder {
    pub fn with_register_user(mut self, uc: impl IRegisterUserUseCase + 'static) -> Self {
        self.register_user = Some(Arc::new(uc));
        self
    }

    pub fn with_verify_email(mut self, uc: impl IVerifyUserEmailUseCase + 'static) -> Self {
        self.verify_email = Some(Arc::new(uc));
        self
    }

    pub fn with_send_verify_code(mut self, uc: impl ISendVerifyCodeUseCase + 'static) -> Self {
        self.send_verify_code = Some(Arc::new(uc));
        self
    }

    pub fn with_login_user(mut self, uc: impl ILoginUserUseCase + 'static) -> Self {
        self.login_user = Some(Arc::new(uc));
        self
    }

    pub fn with_refresh_token(mut self, uc: impl IRefreshTokenUseCase + 'static) -> Self {
        self.refresh_token = Some(Arc::new(uc));
        self
    }

    pub fn with_logout(mut self, uc: impl ILogoutUseCase + 'static) -> Self {
        self.logout = Some(Arc::new(uc));
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            register_user_use_case: self
                .register_user
                .unwrap_or_else(|| Arc::new(StubRegisterUserUseCase::default())),
            verify_email_use_case: self
                .verify_email
                .unwrap_or_else(|| Arc::new(StubVerifyEmailUseCase::default())),
            send_verify_code_use_case: self
                .send_verify_code
                .unwrap_or_else(|| Arc::new(StubSendVerifyCodeUseCase::default())),
            login_user_use_case: self
                .login_user
                .unwrap_or_else(|| Arc::new(StubLoginUserUseCase::default())),
            refresh_token_use_case: self
                .refresh_token
                .unwrap_or_else(|| Arc::new(StubRefreshTokenUseCase::default())),
            logout_use_case: self
                .logout
                .unwrap_or_else(|| Arc::new(StubLogoutUseCase::default())),
        })
    }
}
