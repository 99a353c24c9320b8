use crate::auth::application::domain::entities::VerificationCode;

pub trait VerificationCodeGenerator: Send + Sync {
    fn next(&self) -> VerificationCode;
}
