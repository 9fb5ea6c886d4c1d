//! Forgot Username / Password Use Case
//!
//! Mails a confirmed account holder their username together with a
//! password-reset link.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::one_time_token::OneTimeTokenCodec;
use crate::domain::dispatcher::{EmailMessage, NotificationDispatcher};
use crate::domain::repository::CredentialStore;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::error::{AuthError, AuthResult};

/// Forgot username/password use case
pub struct ForgotCredentialsUseCase<S, P, M>
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

impl<S, P, M> ForgotCredentialsUseCase<S, P, M>
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

        if !account.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let token = self
            .codec
            .generate(TokenPurpose::PasswordReset, &account)
            .await?;
        let link = self.config.reset_link(&token, account.email.as_str());

        let body = format!(
            "<p>Hello: {}</p>\
             <p>Username: {}.</p>\
             <p>In order to reset your password, please click on the following link.</p>\
             <p><a href=\"{}\">Click here</a></p>\
             <p>Thank you,</p>\
             <br>{}",
            account.display_name(),
            account.username,
            link,
            self.config.sender_name
        );

        let message = EmailMessage::html(
            account.email.as_str(),
            "Forgot username or password",
            body,
        );

        match self.mailer.send(&message).await {
            Ok(true) => {
                tracing::info!(username = %account.username, "Reset link sent");
                Ok(())
            }
            Ok(false) => {
                tracing::warn!(to = %message.to, "Reset mail was not delivered");
                Err(AuthError::DeliveryFailed)
            }
            Err(e) => {
                tracing::warn!(to = %message.to, error = %e, "Reset mail dispatch faulted");
                Err(AuthError::DeliveryFailed)
            }
        }
    }
}
