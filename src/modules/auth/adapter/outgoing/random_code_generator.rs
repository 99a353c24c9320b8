use rand::rngs::OsRng;

use crate::auth::application::domain::entities::VerificationCode;
use crate::auth::application::ports::outgoing::VerificationCodeGenerator;

/// Uniform four-digit codes from the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl VerificationCodeGenerator for RandomCodeGenerator {
    fn next(&self) -> VerificationCode {
        VerificationCode::random(&mut OsRng)
    }
}
