//! Resend Confirmation Use Case
//!
//! Regenerates and redispatches the confirmation link for an account
//! that has not confirmed its email yet.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::one_time_token::OneTimeTokenCodec;
use crate::application::register::send_confirmation_link;
use crate::domain::dispatcher::NotificationDispatcher;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::TokenProvider;
use crate::error::{AuthError, AuthResult};

/// Resend confirmation use case
pub struct ResendConfirmationUseCase<S, P, M>
where
    S: CredentialStore,
    P: TokenProvider,
    M: NotificationDispatcher,
{
    store: Arc<S>,
    codec: OneTimeTokenCodec<P>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<S, P, M> ResendConfirmationUseCase<S, P, M>
where
    S: CredentialStore,
    P: TokenProvider,
    M: NotificationDispatcher,
{
    pub fn new(store: Arc<S>, provider: Arc<P>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            codec: OneTimeTokenCodec::new(provider),
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let email = email.trim().to_lowercase();

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.email_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed);
        }

        send_confirmation_link(&self.codec, self.mailer.as_ref(), &self.config, &account).await?;

        tracing::info!(username = %account.username, "Confirmation link resent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::infra::mailer::MockMailer;
    use crate::infra::memory::InMemoryCredentialStore;
    use crate::infra::secrets::HmacTokenProvider;
    use std::time::Duration;

    async fn registered_store(
        mailer: Arc<MockMailer>,
    ) -> (Arc<InMemoryCredentialStore>, Arc<HmacTokenProvider>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let provider = Arc::new(HmacTokenProvider::new([3u8; 32], Duration::from_secs(7200)));
        RegisterUseCase::new(
            store.clone(),
            provider.clone(),
            mailer,
            Arc::new(AuthConfig::default()),
        )
        .execute(RegisterInput {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
        (store, provider)
    }

    #[tokio::test]
    async fn test_resend_sends_fresh_link() {
        let mailer = Arc::new(MockMailer::new());
        let (store, provider) = registered_store(mailer.clone()).await;

        let use_case = ResendConfirmationUseCase::new(
            store,
            provider,
            mailer.clone(),
            Arc::new(AuthConfig::default()),
        );
        use_case.execute("a@b.com").await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].body.contains("account/confirm-email?token="));
    }

    #[tokio::test]
    async fn test_unknown_email_rejected() {
        let mailer = Arc::new(MockMailer::new());
        let (store, provider) = registered_store(mailer.clone()).await;

        let use_case =
            ResendConfirmationUseCase::new(store, provider, mailer, Arc::new(AuthConfig::default()));
        let result = use_case.execute("nobody@b.com").await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_already_confirmed_rejected() {
        let mailer = Arc::new(MockMailer::new());
        let (store, provider) = registered_store(mailer.clone()).await;

        let account = store.find_by_email("a@b.com").await.unwrap().unwrap();
        store.set_email_confirmed(&account.account_id).await.unwrap();

        let use_case =
            ResendConfirmationUseCase::new(store, provider, mailer, Arc::new(AuthConfig::default()));
        let result = use_case.execute("a@b.com").await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyConfirmed)));
    }

    #[tokio::test]
    async fn test_dispatch_fault_reported() {
        let mailer = Arc::new(MockMailer::new());
        let (store, provider) = registered_store(mailer).await;

        let failing = Arc::new(MockMailer::failing());
        let use_case = ResendConfirmationUseCase::new(
            store,
            provider,
            failing,
            Arc::new(AuthConfig::default()),
        );
        let result = use_case.execute("a@b.com").await;
        assert!(matches!(result, Err(AuthError::DeliveryFailed)));
    }
}
