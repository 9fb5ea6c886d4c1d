//! Account Router

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::dispatcher::NotificationDispatcher;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::TokenProvider;
use crate::infra::{HmacTokenProvider, HttpMailer, PgCredentialStore};
use crate::presentation::handlers::{self, AccountAppState};

/// Create the account router with the production implementations
pub fn account_router(
    store: PgCredentialStore,
    provider: HmacTokenProvider,
    mailer: HttpMailer,
    config: AuthConfig,
) -> Router {
    account_router_generic(store, provider, mailer, config)
}

/// Create a generic account router for any port implementations
pub fn account_router_generic<S, P, M>(
    store: S,
    provider: P,
    mailer: M,
    config: AuthConfig,
) -> Router
where
    S: CredentialStore + Send + Sync + 'static,
    P: TokenProvider + Send + Sync + 'static,
    M: NotificationDispatcher + Send + Sync + 'static,
{
    let state = AccountAppState {
        store: Arc::new(store),
        provider: Arc::new(provider),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/login", post(handlers::login::<S, P, M>))
        .route(
            "/refresh-user-token",
            get(handlers::refresh_user_token::<S, P, M>),
        )
        .route("/register", post(handlers::register::<S, P, M>))
        .route("/confirm-email", put(handlers::confirm_email::<S, P, M>))
        .route(
            "/resend-email-confirmation-link/{email}",
            post(handlers::resend_confirmation_link::<S, P, M>),
        )
        .route(
            "/forgot-username-or-password/{email}",
            post(handlers::forgot_username_or_password::<S, P, M>),
        )
        .route("/reset-password", put(handlers::reset_password::<S, P, M>))
        .with_state(state)
}
