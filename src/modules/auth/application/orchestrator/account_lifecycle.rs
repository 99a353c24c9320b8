use std::sync::Arc;

use crate::auth::application::domain::policies::LifecyclePolicy;
use crate::auth::application::ports::outgoing::{
    AccountStore, PasswordHasher, TokenProvider, VerificationCodeGenerator,
};
use crate::auth::application::use_cases::{
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    logout_user::{ILogoutUseCase, LogoutUseCase},
    refresh_token::{IRefreshTokenUseCase, RefreshTokenUseCase},
    register_user::{IRegisterUserUseCase, RegisterUserUseCase},
    send_verify_code::{ISendVerifyCodeUseCase, SendVerifyCodeUseCase},
    verify_user_email::{IVerifyUserEmailUseCase, VerifyUserEmailUseCase},
};
use crate::email::application::ports::outgoing::VerificationCodeNotifier;

/// The six account lifecycle operations wired over one set of collaborators.
///
/// Every use case shares the same store, so a token issued by `login` is
/// visible to `refresh_token` and `logout` without further plumbing.
#[derive(Clone)]
pub struct AccountLifecycle {
    pub register: Arc<dyn IRegisterUserUseCase>,
    pub verify_email: Arc<dyn IVerifyUserEmailUseCase>,
    pub send_verify_code: Arc<dyn ISendVerifyCodeUseCase>,
    pub login: Arc<dyn ILoginUserUseCase>,
    pub refresh_token: Arc<dyn IRefreshTokenUseCase>,
    pub logout: Arc<dyn ILogoutUseCase>,
}

impl AccountLifecycle {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
        codes: Arc<dyn VerificationCodeGenerator>,
        notifier: Arc<dyn VerificationCodeNotifier>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            register: Arc::new(RegisterUserUseCase::new(
                store.clone(),
                hasher.clone(),
                codes.clone(),
                notifier.clone(),
                policy.clone(),
            )),
            verify_email: Arc::new(VerifyUserEmailUseCase::new(store.clone())),
            send_verify_code: Arc::new(SendVerifyCodeUseCase::new(
                store.clone(),
                codes,
                notifier,
                policy.clone(),
            )),
            login: Arc::new(LoginUserUseCase::new(
                store.clone(),
                hasher,
                tokens.clone(),
                policy.clone(),
            )),
            refresh_token: Arc::new(RefreshTokenUseCase::new(store.clone(), tokens, policy)),
            logout: Arc::new(LogoutUseCase::new(store)),
        }
    }
}
