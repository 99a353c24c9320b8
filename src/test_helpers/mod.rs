//! Routes for end-to-end suites. Compiled only with the `test-helpers` feature.

use actix_web::{web, HttpResponse, Result};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::adapter::outgoing::sea_orm_entity::users;
use crate::auth::application::ports::outgoing::AccountStore;
use crate::config::RuntimeEnv;

#[derive(Serialize)]
pub struct RandomAccountResponse {
    email: String,
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct VerificationCodeResponse {
    user_id: Uuid,
    is_verified: bool,
    code: Option<i32>,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize)]
pub struct CleanupResponse {
    deleted_users: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    environment: String,
}

/// GET /test/health
pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        environment: RuntimeEnv::current().as_str().to_string(),
    }))
}

/// Generate random registration credentials
/// GET /test/account/random
pub async fn generate_random_account() -> Result<HttpResponse> {
    let ts = chrono::Utc::now().timestamp();
    let suffix = Uuid::new_v4().simple().to_string();

    Ok(HttpResponse::Ok().json(RandomAccountResponse {
        email: format!("user{}.{}@example.test", ts, &suffix[..8]),
        username: format!("user_{}_{}", ts, &suffix[8..12]),
        password: format!("Pw{}{}", ts, &suffix[12..16]),
    }))
}

/// Read the outstanding verification code without going through the mailbox
/// GET /test/verification-code/{identifier}
pub async fn get_verification_code(
    identifier: web::Path<String>,
    store: web::Data<Arc<dyn AccountStore>>,
) -> Result<HttpResponse> {
    let user = store
        .find_user_by_identifier(identifier.trim())
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(match user {
        Some(user) => HttpResponse::Ok().json(VerificationCodeResponse {
            user_id: user.id,
            is_verified: user.is_verified,
            code: user.verification_code.map(|c| c.value()),
            expires_at: user.verification_expire_time,
        }),
        None => HttpResponse::NotFound().finish(),
    })
}

/// Delete a test user; refresh tokens go with it through the cascade
/// DELETE /test/cleanup/{user_id}
pub async fn cleanup_test_user(
    user_id: web::Path<Uuid>,
    db: web::Data<Arc<DatabaseConnection>>,
) -> Result<HttpResponse> {
    let result = users::Entity::delete_by_id(user_id.into_inner())
        .exec(db.get_ref().as_ref())
        .await
        .map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!("Cleanup failed: {}", e))
        })?;

    Ok(HttpResponse::Ok().json(CleanupResponse {
        deleted_users: result.rows_affected,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/test")
            .route("/health", web::get().to(health_check))
            .route("/account/random", web::get().to(generate_random_account))
            .route(
                "/verification-code/{identifier}",
                web::get().to(get_verification_code),
            )
            .route("/cleanup/{user_id}", web::delete().to(cleanup_test_user)),
    );
}
