//! Application Configuration
//!
//! Configuration for the Auth application layer. Passed explicitly into
//! each use case at construction; there is no ambient global state.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for session token signing (HS256)
    pub session_secret: Vec<u8>,
    /// Issuer claim stamped into session tokens
    pub token_issuer: String,
    /// Session token lifetime
    pub session_ttl: Duration,
    /// Public base URL of the client application
    pub client_base_url: String,
    /// Path (under the client base URL) of the confirm-email page
    pub confirm_email_path: String,
    /// Path (under the client base URL) of the reset-password page
    pub reset_password_path: String,
    /// Display name used when addressing the account holder in mail
    pub sender_name: String,
    /// Consecutive failures after which the account locks (fixed at 3)
    pub lockout_threshold: u16,
    /// Lockout window (fixed at 24 h)
    pub lockout_duration: Duration,
    /// Username of the account exempt from failure counting
    pub bootstrap_admin_username: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: vec![0u8; 32],
            token_issuer: "http://localhost:31310".to_string(),
            session_ttl: Duration::from_secs(24 * 3600),
            client_base_url: "http://localhost:4200".to_string(),
            confirm_email_path: "account/confirm-email".to_string(),
            reset_password_path: "account/reset-password".to_string(),
            sender_name: "Identity Service".to_string(),
            lockout_threshold: 3,
            lockout_duration: Duration::from_secs(24 * 3600),
            bootstrap_admin_username: "admin@example.com".to_string(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Build the confirmation link carried in registration mail
    pub fn confirmation_link(&self, token: &str, email: &str) -> String {
        self.client_link(&self.confirm_email_path, token, email)
    }

    /// Build the reset link carried in forgot-password mail
    pub fn reset_link(&self, token: &str, email: &str) -> String {
        self.client_link(&self.reset_password_path, token, email)
    }

    fn client_link(&self, path: &str, token: &str, email: &str) -> String {
        format!(
            "{}/{}?token={}&email={}",
            self.client_base_url.trim_end_matches('/'),
            path.trim_matches('/'),
            token,
            email
        )
    }

    /// Lockout window as a chrono duration
    pub fn lockout_window(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.lockout_duration)
            .unwrap_or_else(|_| chrono::Duration::hours(24))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
