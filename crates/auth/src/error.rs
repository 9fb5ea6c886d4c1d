//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Account not found
    #[error("Account not found")]
    NotFound,

    /// An account with this email already exists
    #[error("An account already exists with this email address")]
    EmailTaken,

    /// Invalid credentials (unknown username or wrong password)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Email address has not been confirmed yet
    #[error("Please confirm your email address")]
    EmailNotConfirmed,

    /// Account is locked out until the given time
    #[error("Account is locked out until {0}")]
    LockedOut(DateTime<Utc>),

    /// Email address was already confirmed
    #[error("Email address was confirmed before")]
    EmailAlreadyConfirmed,

    /// Single-use token failed to decode or verify
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Outbound notification could not be delivered
    #[error("Failed to send email")]
    DeliveryFailed,

    /// Request input validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Password validation error
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailNotConfirmed => StatusCode::UNAUTHORIZED,
            AuthError::LockedOut(_) => StatusCode::LOCKED,
            AuthError::EmailAlreadyConfirmed => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::DeliveryFailed => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Validation(_) | AuthError::PasswordValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::EmailNotConfirmed
            | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::LockedOut(_) => ErrorKind::Locked,
            AuthError::EmailAlreadyConfirmed => ErrorKind::UnprocessableEntity,
            AuthError::DeliveryFailed => ErrorKind::ServiceUnavailable,
            AuthError::Validation(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::EmailNotConfirmed => {
                err.with_action("Check your inbox for the confirmation link")
            }
            AuthError::EmailAlreadyConfirmed => err.with_action("Please login to your account"),
            AuthError::DeliveryFailed => err.with_action("Please try again later"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::LockedOut(until) => {
                tracing::warn!(lockout_until = %until, "Login attempt on locked account");
            }
            AuthError::DeliveryFailed => {
                tracing::warn!("Notification dispatch failed");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Single-use token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
