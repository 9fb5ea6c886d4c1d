//! In-Memory Credential Store
//!
//! Mutex-serialized substitute for the Postgres store. Backs the test
//! suite and local development without a database; the mutex gives the
//! same per-account atomicity for the failure counter that the SQL
//! implementation gets from single-statement updates.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{account_id::AccountId, password::PasswordHash, role::Role};
use crate::error::{AuthError, AuthResult};

/// In-memory credential store
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_account<T>(
        &self,
        account_id: &AccountId,
        f: impl FnOnce(&mut Account) -> T,
    ) -> AuthResult<T> {
        let mut accounts = self.accounts.lock().expect("credential store lock poisoned");
        let account = accounts
            .get_mut(account_id.as_uuid())
            .ok_or(AuthError::NotFound)?;
        Ok(f(account))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().expect("credential store lock poisoned");
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().expect("credential store lock poisoned");
        Ok(accounts
            .values()
            .find(|a| a.email.as_str() == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let accounts = self.accounts.lock().expect("credential store lock poisoned");
        Ok(accounts.values().any(|a| a.email.as_str() == email))
    }

    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().expect("credential store lock poisoned");
        accounts.insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn assign_role(&self, account_id: &AccountId, role: Role) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            if !account.roles.contains(&role) {
                account.roles.push(role);
            }
        })
    }

    async fn set_email_confirmed(&self, account_id: &AccountId) -> AuthResult<()> {
        self.with_account(account_id, |account| account.confirm_email())
    }

    async fn increment_failed_login(&self, account_id: &AccountId) -> AuthResult<u16> {
        self.with_account(account_id, |account| {
            account.failed_login_count += 1;
            account.failed_login_count
        })
    }

    async fn reset_failed_login(&self, account_id: &AccountId) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            account.failed_login_count = 0;
            account.lockout_until = None;
        })
    }

    async fn set_lockout_until(
        &self,
        account_id: &AccountId,
        until: DateTime<Utc>,
    ) -> AuthResult<()> {
        self.with_account(account_id, |account| account.lockout_until = Some(until))
    }

    async fn set_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &PasswordHash,
    ) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            account.set_password(password_hash.clone())
        })
    }
}
