//! Register Use Case
//!
//! Creates a new unconfirmed account, grants the default role, and
//! dispatches the confirmation link. Dispatch failure is reported to the
//! caller but never rolls back the created account; resending the
//! confirmation link is the recovery path.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::one_time_token::OneTimeTokenCodec;
use crate::domain::dispatcher::{EmailMessage, NotificationDispatcher};
use crate::domain::entity::account::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::domain::value_object::{
    email::Email,
    password::{PasswordHash, RawPassword},
    role::Role,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub account_id: String,
    pub email: String,
}

/// Register use case
pub struct RegisterUseCase<S, P, M>
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

impl<S, P, M> RegisterUseCase<S, P, M>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;

        if self.store.email_exists(email.as_str()).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw = RawPassword::new(input.password)
            .map_err(|e| AuthError::PasswordValidation(e.message().to_string()))?;
        let password_hash = PasswordHash::from_raw(&raw, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let account = Account::new(input.first_name, input.last_name, email, password_hash);

        self.store.create(&account).await?;
        self.store
            .assign_role(&account.account_id, Role::default())
            .await?;

        tracing::info!(username = %account.username, "Account registered");

        // The account stays persisted even if this fails; the caller is
        // told delivery failed and can request a resend
        send_confirmation_link(&self.codec, self.mailer.as_ref(), &self.config, &account).await?;

        Ok(RegisterOutput {
            account_id: account.account_id.to_string(),
            email: account.email.into_db(),
        })
    }
}

/// Compose and dispatch the confirmation-link mail
///
/// Shared with the resend-confirmation flow.
pub(crate) async fn send_confirmation_link<P, M>(
    codec: &OneTimeTokenCodec<P>,
    mailer: &M,
    config: &AuthConfig,
    account: &Account,
) -> AuthResult<()>
where
    P: TokenProvider,
    M: NotificationDispatcher,
{
    let token = codec
        .generate(TokenPurpose::EmailConfirmation, account)
        .await?;
    let link = config.confirmation_link(&token, account.email.as_str());

    let body = format!(
        "<p>Hello: {}</p>\
         <p>Please confirm your email address by clicking on the following link.</p>\
         <p><a href=\"{}\">Click here</a></p>\
         <p>Thank you,</p>\
         <br>{}",
        account.display_name(),
        link,
        config.sender_name
    );

    let message = EmailMessage::html(account.email.as_str(), "Confirm your email", body);

    match mailer.send(&message).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!(to = %message.to, "Confirmation mail was not delivered");
            Err(AuthError::DeliveryFailed)
        }
        Err(e) => {
            tracing::warn!(to = %message.to, error = %e, "Confirmation mail dispatch faulted");
            Err(AuthError::DeliveryFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mailer::MockMailer;
    use crate::infra::memory::InMemoryCredentialStore;
    use crate::infra::secrets::HmacTokenProvider;
    use std::time::Duration;

    fn use_case(
        store: Arc<InMemoryCredentialStore>,
        mailer: Arc<MockMailer>,
    ) -> RegisterUseCase<InMemoryCredentialStore, HmacTokenProvider, MockMailer> {
        let provider = Arc::new(HmacTokenProvider::new([3u8; 32], Duration::from_secs(7200)));
        RegisterUseCase::new(store, provider, mailer, Arc::new(AuthConfig::default()))
    }

    fn input(email: &str) -> RegisterInput {
        RegisterInput {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_unconfirmed_account_and_sends_link() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::new());
        let use_case = use_case(store.clone(), mailer.clone());

        let output = use_case.execute(input("A@B.com")).await.unwrap();
        assert_eq!(output.email, "a@b.com");

        let account = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(!account.email_confirmed);
        assert_eq!(account.username, "a@b.com");
        assert!(account.has_role(Role::Member));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert!(sent[0].is_html);
        assert!(sent[0].body.contains("account/confirm-email?token="));
        assert!(sent[0].body.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_rejected() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::new());
        let use_case = use_case(store, mailer);

        use_case.execute(input("a@b.com")).await.unwrap();

        let result = use_case.execute(input("a@b.com")).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_short_password_rejected() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::new());
        let use_case = use_case(store.clone(), mailer);

        let mut bad = input("a@b.com");
        bad.password = "12345".to_string();

        let result = use_case.execute(bad).await;
        assert!(matches!(result, Err(AuthError::PasswordValidation(_))));
        assert!(!store.email_exists("a@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_invalid_email_rejected() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::new());
        let use_case = use_case(store, mailer);

        let result = use_case.execute(input("not-an-email")).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_dispatch_failure_keeps_account() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::failing());
        let use_case = use_case(store.clone(), mailer);

        let result = use_case.execute(input("a@b.com")).await;
        assert!(matches!(result, Err(AuthError::DeliveryFailed)));

        // The account was committed before dispatch and survives it
        assert!(store.email_exists("a@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_transport_non_delivery_keeps_account() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mailer = Arc::new(MockMailer::rejecting());
        let use_case = use_case(store.clone(), mailer);

        let result = use_case.execute(input("a@b.com")).await;
        assert!(matches!(result, Err(AuthError::DeliveryFailed)));
        assert!(store.email_exists("a@b.com").await.unwrap());
    }
}
