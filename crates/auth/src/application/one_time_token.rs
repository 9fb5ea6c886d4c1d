//! One-Time Token Codec
//!
//! Encodes raw single-use secrets from the token provider into URL-safe
//! text for link transport, and decodes/verifies them on the way back.
//! Malformed input fails closed as `InvalidToken`; no decoding fault ever
//! reaches the caller.

use std::sync::Arc;

use platform::crypto::{from_base64url, to_base64url};

use crate::domain::entity::account::Account;
use crate::domain::token_provider::{TokenProvider, TokenPurpose};
use crate::error::{AuthError, AuthResult};

/// Codec over the token provider port
#[derive(Clone)]
pub struct OneTimeTokenCodec<P>
where
    P: TokenProvider,
{
    provider: Arc<P>,
}

impl<P> OneTimeTokenCodec<P>
where
    P: TokenProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Request a raw secret for (purpose, account) and encode it URL-safe
    pub async fn generate(&self, purpose: TokenPurpose, account: &Account) -> AuthResult<String> {
        let secret = self.provider.issue_secret(purpose, account).await?;
        Ok(to_base64url(secret.as_bytes()))
    }

    /// Decode an encoded token and verify it against (purpose, account)
    pub async fn validate(
        &self,
        purpose: TokenPurpose,
        account: &Account,
        encoded: &str,
    ) -> AuthResult<()> {
        let bytes = from_base64url(encoded).map_err(|_| AuthError::InvalidToken)?;
        let secret = String::from_utf8(bytes).map_err(|_| AuthError::InvalidToken)?;

        if self.provider.verify_secret(purpose, account, &secret).await? {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}
