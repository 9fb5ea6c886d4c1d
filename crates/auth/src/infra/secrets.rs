//! HMAC Token Provider
//!
//! Default `TokenProvider` implementation over
//! `platform::token::SingleUseSecrets`: secrets are bound to the account
//! ID and its security stamp, so nothing is persisted and rotation of
//! the stamp invalidates every outstanding secret.

use std::time::Duration;

use platform::token::SingleUseSecrets;

use crate::domain::entity::account::Account;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::error::AuthResult;

/// HMAC-backed single-use token provider
#[derive(Clone)]
pub struct HmacTokenProvider {
    secrets: SingleUseSecrets,
}

impl HmacTokenProvider {
    /// Create a provider with a signing key and secret validity window
    pub fn new(key: [u8; 32], ttl: Duration) -> Self {
        Self {
            secrets: SingleUseSecrets::new(key, ttl),
        }
    }
}

impl TokenProvider for HmacTokenProvider {
    async fn issue_secret(&self, purpose: TokenPurpose, account: &Account) -> AuthResult<String> {
        Ok(self.secrets.issue(
            purpose.as_str(),
            &account.account_id.to_string(),
            &account.security_stamp,
        ))
    }

    async fn verify_secret(
        &self,
        purpose: TokenPurpose,
        account: &Account,
        secret: &str,
    ) -> AuthResult<bool> {
        Ok(self.secrets.verify(
            purpose.as_str(),
            &account.account_id.to_string(),
            &account.security_stamp,
            secret,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        email::Email,
        password::{PasswordHash, RawPassword},
    };

    fn account() -> Account {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();
        Account::new("Jane", "Doe", Email::new("a@b.com").unwrap(), hash)
    }

    #[tokio::test]
    async fn test_issue_verify_roundtrip() {
        let provider = HmacTokenProvider::new([1u8; 32], Duration::from_secs(3600));
        let account = account();

        let secret = provider
            .issue_secret(TokenPurpose::EmailConfirmation, &account)
            .await
            .unwrap();
        assert!(
            provider
                .verify_secret(TokenPurpose::EmailConfirmation, &account, &secret)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_stamp_rotation_invalidates_secret() {
        let provider = HmacTokenProvider::new([1u8; 32], Duration::from_secs(3600));
        let mut account = account();

        let secret = provider
            .issue_secret(TokenPurpose::PasswordReset, &account)
            .await
            .unwrap();

        account.confirm_email(); // rotates the stamp

        assert!(
            !provider
                .verify_secret(TokenPurpose::PasswordReset, &account, &secret)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_expired_secret_rejected() {
        let provider = HmacTokenProvider::new([1u8; 32], Duration::ZERO);
        let account = account();

        let secret = provider
            .issue_secret(TokenPurpose::EmailConfirmation, &account)
            .await
            .unwrap();
        assert!(
            !provider
                .verify_secret(TokenPurpose::EmailConfirmation, &account, &secret)
                .await
                .unwrap()
        );
    }
}
