/// Account service - main entry point
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use account_service::clock::{SharedClock, SystemClock};
use account_service::db::PgUserRepository;
use account_service::routes::configure_routes;
use account_service::services::captcha::CaptchaStore;
use account_service::services::credential::CredentialService;
use account_service::services::email::SmtpMailer;
use account_service::services::rate_limit::RecoveryRateLimiter;
use account_service::{AppState, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().expect("Failed to load configuration from environment");

    tracing::info!(
        host = %settings.server.host,
        port = settings.server.port,
        "Starting account service"
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connection pool initialized");

    let clock: SharedClock = Arc::new(SystemClock);
    let users = Arc::new(PgUserRepository::new(db_pool));
    let mailer = Arc::new(
        SmtpMailer::new(
            &settings.email,
            settings.recovery.reset_base_url.clone(),
            settings.recovery.token_ttl_hours,
        )
        .expect("Failed to configure mailer"),
    );

    let credentials = Arc::new(CredentialService::new(
        users.clone(),
        mailer,
        clock.clone(),
        chrono::Duration::hours(settings.recovery.token_ttl_hours),
    ));
    let captcha = Arc::new(CaptchaStore::new(
        chrono::Duration::seconds(settings.captcha.ttl_secs),
        settings.captcha.code_length,
        clock.clone(),
    ));
    let rate_limiter = Arc::new(RecoveryRateLimiter::new(
        settings.recovery.attempt_log.clone(),
        settings.recovery.max_attempts,
        chrono::Duration::seconds(settings.recovery.window_secs),
        clock,
    ));

    let state = AppState {
        users,
        credentials,
        captcha,
        rate_limiter,
    };

    let bind_addr = (settings.server.host.clone(), settings.server.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
