//! Session Token Issuer
//!
//! Mints signed, time-bounded session tokens for authenticated accounts.
//! Stateless; tokens are never persisted.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::error::{AuthError, AuthResult};

/// Claims embedded in every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — account ID (UUID string)
    pub sub: String,
    /// Email (doubles as the username)
    pub email: String,
    /// First name
    pub given_name: String,
    /// Last name
    pub family_name: String,
    /// One entry per role held
    pub roles: Vec<String>,
    /// Issuer
    pub iss: String,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Session token issuer
///
/// Deterministic given identical inputs and clock: the same account and
/// instant always produce the same token.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    config: Arc<AuthConfig>,
}

impl SessionTokenIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a signed HS256 session token for an authenticated account
    pub fn issue(&self, account: &Account) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account.account_id.to_string(),
            email: account.email.as_str().to_string(),
            given_name: account.first_name.clone(),
            family_name: account.last_name.clone(),
            roles: account.roles.iter().map(|r| r.code().to_string()).collect(),
            iss: self.config.token_issuer.clone(),
            iat: now,
            exp: now + self.config.session_ttl.as_secs() as i64,
        };

        let key = EncodingKey::from_secret(&self.config.session_secret);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| AuthError::Internal(format!("Session token encode: {e}")))
    }

    /// Decode and verify a session token
    pub fn decode(&self, token: &str) -> AuthResult<SessionClaims> {
        let key = DecodingKey::from_secret(&self.config.session_secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.token_issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
