//! Refresh Session Use Case
//!
//! Exchanges a still-valid session token for a fresh one, rebuilding the
//! claims from the account's current state.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenIssuer;
use crate::domain::repository::CredentialStore;
use crate::error::{AuthError, AuthResult};

/// Refresh session output
pub struct RefreshSessionOutput {
    pub first_name: String,
    pub last_name: String,
    pub token: String,
}

/// Refresh session use case
pub struct RefreshSessionUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    issuer: SessionTokenIssuer,
}

impl<S> RefreshSessionUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            issuer: SessionTokenIssuer::new(config),
        }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<RefreshSessionOutput> {
        let claims = self.issuer.decode(token)?;

        let account = self
            .store
            .find_by_username(&claims.email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let token = self.issuer.issue(&account)?;

        Ok(RefreshSessionOutput {
            first_name: account.first_name,
            last_name: account.last_name,
            token,
        })
    }
}
