//! Canned use-case results for handler tests.

use async_trait::async_trait;

use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::use_cases::login_user::{
    ILoginUserUseCase, LoginOutput, LoginRequest,
};
use crate::auth::application::use_cases::logout_user::{
    ILogoutUseCase, LogoutOutput, LogoutRequest,
};
use crate::auth::application::use_cases::refresh_token::{
    IRefreshTokenUseCase, RefreshTokenOutput, RefreshTokenRequest,
};
use crate::auth::application::use_cases::register_user::{
    IRegisterUserUseCase, RegisterUserOutput, RegisterUserRequest,
};
use crate::auth::application::use_cases::send_verify_code::{
    ISendVerifyCodeUseCase, SendVerifyCodeOutput, SendVerifyCodeRequest,
};
use crate::auth::application::use_cases::verify_user_email::{
    IVerifyUserEmailUseCase, VerifyEmailOutput, VerifyEmailRequest,
};

macro_rules! canned_use_case {
    ($stub:ident, $trait:ident, $request:ty, $output:ty) => {
        #[derive(Clone)]
        pub struct $stub {
            result: Result<$output, AuthError>,
        }

        impl $stub {
            pub fn ok(output: $output) -> Self {
                Self { result: Ok(output) }
            }

            pub fn err(error: AuthError) -> Self {
                Self { result: Err(error) }
            }
        }

        impl Default for $stub {
            fn default() -> Self {
                Self::err(AuthError::internal(stringify!($stub), "not configured"))
            }
        }

        #[async_trait]
        impl $trait for $stub {
            async fn execute(&self, _request: $request) -> Result<$output, AuthError> {
                self.result.clone()
            }
        }
    };
}

canned_use_case!(
    StubRegisterUserUseCase,
    IRegisterUserUseCase,
    RegisterUserRequest,
    RegisterUserOutput
);
canned_use_case!(
    StubVerifyEmailUseCase,
    IVerifyUserEmailUseCase,
    VerifyEmailRequest,
    VerifyEmailOutput
);
canned_use_case!(
    StubSendVerifyCodeUseCase,
    ISendVerifyCodeUseCase,
    SendVerifyCodeRequest,
    SendVerifyCodeOutput
);
canned_use_case!(StubLoginUserUseCase, ILoginUserUseCase, LoginRequest, LoginOutput);
canned_use_case!(
    StubRefreshTokenUseCase,
    IRefreshTokenUseCase,
    RefreshTokenRequest,
    RefreshTokenOutput
);
canned_use_case!(StubLogoutUseCase, ILogoutUseCase, LogoutRequest, LogoutOutput);
