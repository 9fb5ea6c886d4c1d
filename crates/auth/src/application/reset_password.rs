//! Reset Password Use Case
//!
//! Replaces the password hash of a confirmed account when presented with
//! a valid reset token. The security stamp rotates with the hash, so the
//! token cannot be replayed.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::one_time_token::OneTimeTokenCodec;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::domain::value_object::password::{PasswordHash, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Reset password input
pub struct ResetPasswordInput {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<S, P>
where
    S: CredentialStore,
    P: TokenProvider,
{
    store: Arc<S>,
    codec: OneTimeTokenCodec<P>,
    config: Arc<AuthConfig>,
}

impl<S, P> ResetPasswordUseCase<S, P>
where
    S: CredentialStore,
    P: TokenProvider,
{
    pub fn new(store: Arc<S>, provider: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            codec: OneTimeTokenCodec::new(provider),
            config,
        }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        let email = input.email.trim().to_lowercase();

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !account.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        self.codec
            .validate(TokenPurpose::PasswordReset, &account, &input.token)
            .await?;

        let raw = RawPassword::new(input.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.message().to_string()))?;
        let password_hash = PasswordHash::from_raw(&raw, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.store
            .set_password_hash(&account.account_id, &password_hash)
            .await?;

        tracing::info!(username = %account.username, "Password reset");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_in::SignInUseCase;
    use crate::domain::entity::account::Account;
    use crate::domain::value_object::email::Email;
    use crate::infra::memory::InMemoryCredentialStore;
    use crate::infra::secrets::HmacTokenProvider;
    use std::time::Duration;

    struct Fixture {
        store: Arc<InMemoryCredentialStore>,
        provider: Arc<HmacTokenProvider>,
        config: Arc<AuthConfig>,
    }

    impl Fixture {
        async fn new() -> Self {
            let raw = RawPassword::new("secret1".to_string()).unwrap();
            let hash = PasswordHash::from_raw(&raw, None).unwrap();
            let mut account = Account::new("Jane", "Doe", Email::new("a@b.com").unwrap(), hash);
            account.email_confirmed = true;

            let store = Arc::new(InMemoryCredentialStore::new());
            store.create(&account).await.unwrap();

            Self {
                store,
                provider: Arc::new(HmacTokenProvider::new([3u8; 32], Duration::from_secs(7200))),
                config: Arc::new(AuthConfig::with_random_secret()),
            }
        }

        fn use_case(&self) -> ResetPasswordUseCase<InMemoryCredentialStore, HmacTokenProvider> {
            ResetPasswordUseCase::new(
                self.store.clone(),
                self.provider.clone(),
                self.config.clone(),
            )
        }

        /// Generate a valid encoded reset token for the stored account
        async fn reset_token(&self) -> String {
            let account = self.store.find_by_email("a@b.com").await.unwrap().unwrap();
            OneTimeTokenCodec::new(self.provider.clone())
                .generate(TokenPurpose::PasswordReset, &account)
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_reset_replaces_password() {
        let fx = Fixture::new().await;
        let token = fx.reset_token().await;

        fx.use_case()
            .execute(ResetPasswordInput {
                email: "a@b.com".to_string(),
                token,
                new_password: "changed1".to_string(),
            })
            .await
            .unwrap();

        let sign_in = SignInUseCase::new(fx.store.clone(), fx.config.clone());
        assert!(
            sign_in
                .authenticate("a@b.com", "changed1".to_string())
                .await
                .is_ok()
        );
        assert!(matches!(
            sign_in.authenticate("a@b.com", "secret1".to_string()).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_token_is_single_use() {
        let fx = Fixture::new().await;
        let token = fx.reset_token().await;

        let use_case = fx.use_case();
        use_case
            .execute(ResetPasswordInput {
                email: "a@b.com".to_string(),
                token: token.clone(),
                new_password: "changed1".to_string(),
            })
            .await
            .unwrap();

        // The stamp rotated with the hash; the same token must not work twice
        let result = use_case
            .execute(ResetPasswordInput {
                email: "a@b.com".to_string(),
                token,
                new_password: "changed2".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_unknown_email_rejected() {
        let fx = Fixture::new().await;

        let result = fx
            .use_case()
            .execute(ResetPasswordInput {
                email: "nobody@b.com".to_string(),
                token: "whatever".to_string(),
                new_password: "changed1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_unconfirmed_account_rejected() {
        let fx = Fixture::new().await;
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();
        let pending = Account::new("Late", "Joiner", Email::new("p@b.com").unwrap(), hash);
        fx.store.create(&pending).await.unwrap();

        let result = fx
            .use_case()
            .execute(ResetPasswordInput {
                email: "p@b.com".to_string(),
                token: "whatever".to_string(),
                new_password: "changed1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::EmailNotConfirmed)));
    }

    #[tokio::test]
    async fn test_garbled_token_rejected() {
        let fx = Fixture::new().await;

        let result = fx
            .use_case()
            .execute(ResetPasswordInput {
                email: "a@b.com".to_string(),
                token: "??not a token??".to_string(),
                new_password: "changed1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_weak_new_password_rejected_after_valid_token() {
        let fx = Fixture::new().await;
        let token = fx.reset_token().await;

        let result = fx
            .use_case()
            .execute(ResetPasswordInput {
                email: "a@b.com".to_string(),
                token,
                new_password: "123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::PasswordValidation(_))));
    }
}
