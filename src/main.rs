pub mod modules;
pub use modules::{auth, email};

mod api;
mod config;
pub mod health;
mod shared;

// Test helpers module - only compiled with feature flag
#[cfg(feature = "test-helpers")]
mod test_helpers;

#[cfg(test)]
mod tests;

use crate::api::openapi::ApiDoc;
use crate::auth::adapter::incoming::web::routes::init_routes;
use crate::auth::adapter::outgoing::jwt::JwtTokenService;
use crate::auth::adapter::outgoing::security::BcryptHasher;
use crate::auth::adapter::outgoing::{
    AccountStorePostgres, CachedAccountStore, RandomCodeGenerator, RedisTokenCache,
};
use crate::auth::application::orchestrator::AccountLifecycle;
use crate::auth::application::ports::outgoing::AccountStore;
use crate::auth::application::use_cases::{
    login_user::ILoginUserUseCase, logout_user::ILogoutUseCase,
    refresh_token::IRefreshTokenUseCase, register_user::IRegisterUserUseCase,
    send_verify_code::ISendVerifyCodeUseCase, verify_user_email::IVerifyUserEmailUseCase,
};
use crate::config::AppConfig;
use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::services::UserEmailService;
use crate::shared::api::custom_json_config;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use deadpool_redis::{Config, Runtime};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase>,
    pub verify_email_use_case: Arc<dyn IVerifyUserEmailUseCase>,
    pub send_verify_code_use_case: Arc<dyn ISendVerifyCodeUseCase>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase>,
    pub refresh_token_use_case: Arc<dyn IRefreshTokenUseCase>,
    pub logout_use_case: Arc<dyn ILogoutUseCase>,
}

impl From<AccountLifecycle> for AppState {
    fn from(lifecycle: AccountLifecycle) -> Self {
        Self {
            register_user_use_case: lifecycle.register,
            verify_email_use_case: lifecycle.verify_email,
            send_verify_code_use_case: lifecycle.send_verify_code,
            login_user_use_case: lifecycle.login,
            refresh_token_use_case: lifecycle.refresh_token,
            logout_use_case: lifecycle.logout,
        }
    }
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = config::load_env_files();
    info!(environment = runtime.as_str(), "Starting auth service");

    // Refuse to expose test routes in production
    #[cfg(feature = "test-helpers")]
    {
        if runtime.is_production() {
            anyhow::bail!("test-helpers feature must not be enabled in production");
        }
        warn!(
            environment = runtime.as_str(),
            "Test helper routes are ENABLED"
        );
    }

    // Needed by the TLS-enabled Redis client
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::from_env(runtime).context("invalid configuration")?;
    let server_url = config.server_url();

    // Database connection
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db = Arc::new(
        Database::connect(opt)
            .await
            .context("failed to connect to database")?,
    );

    let postgres_store: Arc<dyn AccountStore> = Arc::new(AccountStorePostgres::new(db.clone()));

    // Redis is optional; without it every lookup goes to Postgres
    let redis_pool = match &config.redis_url {
        Some(url) => {
            let pool = Config::from_url(url)
                .create_pool(Some(Runtime::Tokio1))
                .context("failed to create Redis pool")?;
            Some(Arc::new(pool))
        }
        None => {
            warn!("REDIS_URL not set; refresh-token cache disabled");
            None
        }
    };

    let store: Arc<dyn AccountStore> = match &redis_pool {
        Some(pool) => Arc::new(CachedAccountStore::new(
            postgres_store,
            Arc::new(RedisTokenCache::new(pool.clone())),
        )),
        None => postgres_store,
    };

    let smtp_sender = SmtpEmailSender::from_config(&config.mail)
        .context("failed to build SMTP transport")?;
    let notifier = UserEmailService::new(
        Arc::new(smtp_sender),
        config.policy.verification_code_ttl,
    );

    let lifecycle = AccountLifecycle::new(
        store.clone(),
        Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        Arc::new(JwtTokenService::new(config.jwt.clone())),
        Arc::new(RandomCodeGenerator),
        Arc::new(notifier),
        config.policy.clone(),
    );
    let state = web::Data::new(AppState::from(lifecycle));

    let db_data = web::Data::new(db);
    let redis_data = redis_pool.map(web::Data::new);
    let store_data = web::Data::new(store);
    let openapi = ApiDoc::openapi();

    info!(%server_url, "Listening");

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(state.clone())
            .app_data(custom_json_config())
            .app_data(db_data.clone())
            .app_data(store_data.clone())
            .configure(init_routes)
            .service(crate::health::health)
            .service(crate::health::readiness)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            );

        if let Some(redis) = &redis_data {
            app = app.app_data(redis.clone());
        }

        // Conditionally add test routes
        #[cfg(feature = "test-helpers")]
        {
            app = app.configure(test_helpers::configure_routes);
        }

        app
    })
    .bind(&server_url)?
    .run()
    .await?;

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e:#}");
        std::process::exit(1);
    }
}
