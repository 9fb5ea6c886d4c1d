//! Auth (Account Authentication & Credential Lifecycle) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, and the consumed ports
//! - `application/` - Use cases (one per credential flow)
//! - `infra/` - Database, token provider, and mail implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Username/password login with brute-force lockout (3 failures, 24 h)
//! - Registration with email confirmation (single-use link tokens)
//! - Forgot-username/password and password reset flows
//! - Signed session tokens carrying name and role claims
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Single-use tokens bound to a rotating per-account security stamp
//! - The bootstrap administrator is exempt from failure counting
//! - Notification dispatch bounded by a hard timeout

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgCredentialStore;
pub use presentation::router::account_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgCredentialStore as AccountStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
