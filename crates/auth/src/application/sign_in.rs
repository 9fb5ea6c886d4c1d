//! Sign In Use Case
//!
//! Decides the authentication outcome for a username/password attempt,
//! maintains the failure-count/lockout state, and mints a session token
//! on success.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokenIssuer;
use crate::domain::entity::account::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::password::RawPassword;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// Username (the lower-cased email)
    pub username: String,
    /// Password
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub first_name: String,
    pub last_name: String,
    /// Signed session token
    pub token: String,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    issuer: SessionTokenIssuer,
    config: Arc<AuthConfig>,
}

impl<S> SignInUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            issuer: SessionTokenIssuer::new(config.clone()),
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let account = self.authenticate(&input.username, input.password).await?;

        let token = self.issuer.issue(&account)?;

        tracing::info!(username = %account.username, "Account signed in");

        Ok(SignInOutput {
            first_name: account.first_name,
            last_name: account.last_name,
            token,
        })
    }

    /// Decide the authentication outcome and persist counter/lockout state
    pub async fn authenticate(&self, username: &str, password: String) -> AuthResult<Account> {
        let username = username.trim().to_lowercase();

        let account = self
            .store
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Checked before lockout and password: an unconfirmed account
        // cannot authenticate at all
        if !account.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let verified = match RawPassword::new(password) {
            Ok(raw) => account.password_hash.verify(&raw, self.config.pepper()),
            // A password the policy would never have admitted cannot match
            Err(_) => false,
        };

        // An active lockout wins regardless of password correctness
        if let Some(until) = account.lockout_until {
            if Utc::now() < until {
                return Err(AuthError::LockedOut(until));
            }
        }

        if !verified {
            return Err(self.record_failure(&account).await?);
        }

        self.store.reset_failed_login(&account.account_id).await?;

        Ok(account)
    }

    /// Count the failure and decide between `InvalidCredentials` and
    /// `LockedOut`. The bootstrap administrator is exempt from counting.
    async fn record_failure(&self, account: &Account) -> AuthResult<AuthError> {
        if account.username == self.config.bootstrap_admin_username {
            return Ok(AuthError::InvalidCredentials);
        }

        let new_count = self
            .store
            .increment_failed_login(&account.account_id)
            .await?;

        if new_count > self.config.lockout_threshold {
            let until = Utc::now() + self.config.lockout_window();
            self.store
                .set_lockout_until(&account.account_id, until)
                .await?;

            tracing::warn!(
                username = %account.username,
                failed_count = new_count,
                lockout_until = %until,
                "Account locked out after repeated failures"
            );

            return Ok(AuthError::LockedOut(until));
        }

        Ok(AuthError::InvalidCredentials)
    }
}
