//! Confirm Email Use Case
//!
//! Transitions an account from pending to confirmed when presented with
//! a valid confirmation token.

use std::sync::Arc;

use crate::application::one_time_token::OneTimeTokenCodec;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::error::{AuthError, AuthResult};

/// Confirm email input
pub struct ConfirmEmailInput {
    pub email: String,
    pub token: String,
}

/// Confirm email use case
pub struct ConfirmEmailUseCase<S, P>
where
    S: CredentialStore,
    P: TokenProvider,
{
    store: Arc<S>,
    codec: OneTimeTokenCodec<P>,
}

impl<S, P> ConfirmEmailUseCase<S, P>
where
    S: CredentialStore,
    P: TokenProvider,
{
    pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
        Self {
            store,
            codec: OneTimeTokenCodec::new(provider),
        }
    }

    pub async fn execute(&self, input: ConfirmEmailInput) -> AuthResult<()> {
        let email = input.email.trim().to_lowercase();

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.email_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed);
        }

        self.codec
            .validate(TokenPurpose::EmailConfirmation, &account, &input.token)
            .await?;

        self.store.set_email_confirmed(&account.account_id).await?;

        tracing::info!(username = %account.username, "Email address confirmed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::infra::mailer::MockMailer;
    use crate::infra::memory::InMemoryCredentialStore;
    use crate::infra::secrets::HmacTokenProvider;
    use std::time::Duration;

    struct Fixture {
        store: Arc<InMemoryCredentialStore>,
        provider: Arc<HmacTokenProvider>,
        mailer: Arc<MockMailer>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryCredentialStore::new()),
                provider: Arc::new(HmacTokenProvider::new([3u8; 32], Duration::from_secs(7200))),
                mailer: Arc::new(MockMailer::new()),
            }
        }

        async fn register(&self, email: &str) {
            let use_case = RegisterUseCase::new(
                self.store.clone(),
                self.provider.clone(),
                self.mailer.clone(),
                Arc::new(AuthConfig::default()),
            );
            use_case
                .execute(RegisterInput {
                    first_name: "Jane".to_string(),
                    last_name: "Doe".to_string(),
                    email: email.to_string(),
                    password: "secret1".to_string(),
                })
                .await
                .unwrap();
        }

        /// Pull the encoded token out of the last confirmation mail
        fn last_token(&self) -> String {
            let sent = self.mailer.sent();
            let body = &sent.last().unwrap().body;
            let start = body.find("token=").unwrap() + "token=".len();
            let end = body[start..].find('&').unwrap() + start;
            body[start..end].to_string()
        }

        fn confirm_use_case(&self) -> ConfirmEmailUseCase<InMemoryCredentialStore, HmacTokenProvider> {
            ConfirmEmailUseCase::new(self.store.clone(), self.provider.clone())
        }
    }

    #[tokio::test]
    async fn test_confirm_with_mailed_token() {
        let fx = Fixture::new();
        fx.register("a@b.com").await;

        fx.confirm_use_case()
            .execute(ConfirmEmailInput {
                email: "a@b.com".to_string(),
                token: fx.last_token(),
            })
            .await
            .unwrap();

        let account = fx.store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(account.email_confirmed);
    }

    #[tokio::test]
    async fn test_confirmed_account_can_sign_in() {
        use crate::application::sign_in::SignInUseCase;

        let fx = Fixture::new();
        fx.register("a@b.com").await;

        fx.confirm_use_case()
            .execute(ConfirmEmailInput {
                email: "a@b.com".to_string(),
                token: fx.last_token(),
            })
            .await
            .unwrap();

        let sign_in = SignInUseCase::new(fx.store.clone(), Arc::new(AuthConfig::default()));
        let account = sign_in
            .authenticate("a@b.com", "secret1".to_string())
            .await
            .unwrap();
        assert_eq!(account.username, "a@b.com");
    }

    #[tokio::test]
    async fn test_unknown_email_rejected() {
        let fx = Fixture::new();

        let result = fx
            .confirm_use_case()
            .execute(ConfirmEmailInput {
                email: "nobody@b.com".to_string(),
                token: "whatever".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_already_confirmed_rejected() {
        let fx = Fixture::new();
        fx.register("a@b.com").await;
        let token = fx.last_token();

        let use_case = fx.confirm_use_case();
        use_case
            .execute(ConfirmEmailInput {
                email: "a@b.com".to_string(),
                token: token.clone(),
            })
            .await
            .unwrap();

        let result = use_case
            .execute(ConfirmEmailInput {
                email: "a@b.com".to_string(),
                token,
            })
            .await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyConfirmed)));
    }

    #[tokio::test]
    async fn test_garbled_token_rejected() {
        let fx = Fixture::new();
        fx.register("a@b.com").await;

        let result = fx
            .confirm_use_case()
            .execute(ConfirmEmailInput {
                email: "a@b.com".to_string(),
                token: "!!garbage!!".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));

        let account = fx.store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(!account.email_confirmed);
    }

    #[tokio::test]
    async fn test_other_accounts_token_rejected() {
        let fx = Fixture::new();
        fx.register("a@b.com").await;
        let token_for_a = fx.last_token();
        fx.register("c@d.com").await;

        let result = fx
            .confirm_use_case()
            .execute(ConfirmEmailInput {
                email: "c@d.com".to_string(),
                token: token_for_a,
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
