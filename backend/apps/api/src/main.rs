//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, PgAccountRepository, SmtpCodeNotifier, SmtpConfig, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn token_secret(var: &str) -> anyhow::Result<Vec<u8>> {
    let b64 = env::var(var).map_err(|_| anyhow::anyhow!("{} must be set in production", var))?;
    Ok(Engine::decode(&general_purpose::STANDARD, &b64)?)
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::with_random_secrets()
    } else {
        AuthConfig {
            access_secret: token_secret("ACCESS_TOKEN_SECRET")?,
            refresh_secret: token_secret("REFRESH_TOKEN_SECRET")?,
            ..Default::default()
        }
    };

    if let Ok(minutes) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
        config.access_ttl_minutes = minutes.parse()?;
    }
    if let Ok(minutes) = env::var("REFRESH_TOKEN_EXPIRE_MINUTES") {
        config.refresh_ttl_minutes = minutes.parse()?;
    }
    if let Ok(length) = env::var("VERIFICATION_CODE_LENGTH") {
        config.code_length = length.parse()?;
    }
    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    Ok(config)
}

fn code_notifier() -> SmtpCodeNotifier {
    let settings = (
        env::var("SMTP_USERNAME"),
        env::var("SMTP_PASSWORD"),
        env::var("SMTP_HOST"),
    );

    match settings {
        (Ok(username), Ok(password), Ok(host)) => {
            let port = env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587);
            let sender_name =
                env::var("SMTP_SENDER_NAME").unwrap_or_else(|_| "Accounts".to_string());

            SmtpCodeNotifier::new(SmtpConfig {
                username,
                password,
                host,
                port,
                sender_name,
            })
        }
        _ => {
            tracing::warn!("SMTP credentials not set, verification emails disabled");
            SmtpCodeNotifier::unconfigured()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = auth_config()?;
    let repo = PgAccountRepository::new(pool.clone());
    let notifier = code_notifier();

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(repo, notifier, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
