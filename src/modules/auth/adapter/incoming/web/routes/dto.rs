use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::application::domain::entities::PublicUser;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    /// User ID (UUID)
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: String,

    #[schema(example = "john@example.com")]
    pub email: String,

    #[schema(example = "johndoe")]
    pub username: String,

    #[schema(example = false)]
    pub is_verified: bool,

    #[schema(example = false)]
    pub is_premium: bool,

    /// Only present when the service runs with `EXPOSE_VERIFICATION_CODE=true`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 4821)]
    pub verification_code: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PublicUser> for UserView {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
            is_verified: user.is_verified,
            is_premium: user.is_premium,
            verification_code: user.verification_code,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `{success, message}` body shared by the acknowledgement-style endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,

    #[schema(example = "Email verified successfully")]
    pub message: String,
}
