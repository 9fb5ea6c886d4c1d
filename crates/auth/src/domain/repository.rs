//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::value_object::{account_id::AccountId, password::PasswordHash, role::Role};
use crate::error::AuthResult;

/// Credential store trait
///
/// Mutating operations on a missing account return `AuthError::NotFound`,
/// never a silent no-op. `increment_failed_login` must be atomic per
/// account (a single read-modify-write) so concurrent attempts cannot
/// race past the lockout threshold.
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Find an account by username (the lower-cased email)
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>>;

    /// Find an account by email address
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Check if an account exists with the given email
    async fn email_exists(&self, email: &str) -> AuthResult<bool>;

    /// Create a new account (without roles; see `assign_role`)
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Grant a role to an account
    async fn assign_role(&self, account_id: &AccountId, role: Role) -> AuthResult<()>;

    /// Mark the email as confirmed, rotating the security stamp
    async fn set_email_confirmed(&self, account_id: &AccountId) -> AuthResult<()>;

    /// Atomically increment the failure counter, returning the new count
    async fn increment_failed_login(&self, account_id: &AccountId) -> AuthResult<u16>;

    /// Reset the failure counter to zero and clear any lockout
    async fn reset_failed_login(&self, account_id: &AccountId) -> AuthResult<()>;

    /// Set the lockout expiry
    async fn set_lockout_until(
        &self,
        account_id: &AccountId,
        until: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Replace the password hash, rotating the security stamp
    async fn set_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &PasswordHash,
    ) -> AuthResult<()>;
}
