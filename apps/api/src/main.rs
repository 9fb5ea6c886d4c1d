//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use auth::domain::entity::account::Account;
use auth::domain::repository::CredentialStore;
use auth::domain::value_object::{
    email::Email,
    password::{PasswordHash, RawPassword},
    role::Role,
};
use auth::infra::{HmacTokenProvider, HttpMailer, MailerConfig, PgCredentialStore};
use auth::{AuthConfig, account_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Validity window for confirmation/reset link tokens
const LINK_TOKEN_TTL: Duration = Duration::from_secs(2 * 3600);

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
    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::with_random_secret()
    } else {
        AuthConfig {
            session_secret: secret_from_env("SESSION_SECRET")?,
            ..AuthConfig::default()
        }
    };
    let auth_config = AuthConfig {
        token_issuer: env::var("TOKEN_ISSUER").unwrap_or(auth_config.token_issuer),
        client_base_url: env::var("CLIENT_BASE_URL").unwrap_or(auth_config.client_base_url),
        sender_name: env::var("SENDER_NAME").unwrap_or(auth_config.sender_name),
        bootstrap_admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME")
            .unwrap_or(auth_config.bootstrap_admin_username),
        ..auth_config
    };

    // Single-use token provider
    let token_key = if cfg!(debug_assertions) {
        random_key()
    } else {
        let secret = secret_from_env("TOKEN_SECRET")?;
        let mut key = [0u8; 32];
        key.copy_from_slice(&secret);
        key
    };
    let provider = HmacTokenProvider::new(token_key, LINK_TOKEN_TTL);

    // Outbound mail
    let mailer_config = MailerConfig {
        endpoint: env::var("MAIL_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8025/api/send".to_string()),
        api_key: env::var("MAIL_API_KEY").ok(),
        from_address: env::var("MAIL_FROM")
            .unwrap_or_else(|_| "no-reply@example.com".to_string()),
        from_name: auth_config.sender_name.clone(),
        timeout: Duration::from_secs(10),
    };
    let mailer = HttpMailer::new(mailer_config)?;

    // Seed the bootstrap administrator on first start
    let store = PgCredentialStore::new(pool.clone());
    seed_bootstrap_admin(&store, &auth_config).await?;

    // CORS: the client application origin only
    let allowed_origin: http::HeaderValue = auth_config.client_base_url.parse()?;

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
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
        .nest(
            "/api/account",
            account_router(store, provider, mailer, auth_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31310));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the bootstrap administrator if it does not exist yet
///
/// The account arrives confirmed and holding every role; its username is
/// the one exempted from failure counting.
async fn seed_bootstrap_admin(store: &PgCredentialStore, config: &AuthConfig) -> anyhow::Result<()> {
    if store
        .find_by_username(&config.bootstrap_admin_username)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password = env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| "123456".to_string());
    let raw = RawPassword::new(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let hash = PasswordHash::from_raw(&raw, config.pepper())
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let email = Email::new(&config.bootstrap_admin_username)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let mut admin = Account::new("Admin", "User", email, hash);
    admin.email_confirmed = true;

    store.create(&admin).await?;
    for role in Role::ALL {
        store.assign_role(&admin.account_id, role).await?;
    }

    tracing::info!(username = %admin.username, "Bootstrap administrator created");

    Ok(())
}

/// Decode a 32-byte base64 secret from the environment
fn secret_from_env(name: &str) -> anyhow::Result<Vec<u8>> {
    let secret_b64 =
        env::var(name).unwrap_or_else(|_| panic!("{name} must be set in production"));
    let secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
    anyhow::ensure!(secret.len() == 32, "{name} must decode to 32 bytes");
    Ok(secret)
}

/// Random 32-byte key (for development)
fn random_key() -> [u8; 32] {
    let bytes = platform::crypto::random_bytes(32);
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    key
}
