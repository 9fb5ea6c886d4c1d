//! Token Provider Port
//!
//! Supplied primitive that owns the raw single-use secrets: their
//! validity window and binding to an account. The application layer only
//! ever sees it through `OneTimeTokenCodec`.

use crate::domain::entity::account::Account;
use crate::error::AuthResult;

/// Purpose a single-use secret is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailConfirmation,
    PasswordReset,
}

impl TokenPurpose {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::EmailConfirmation => "email-confirmation",
            TokenPurpose::PasswordReset => "password-reset",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-use secret provider trait
#[trait_variant::make(TokenProvider: Send)]
pub trait LocalTokenProvider {
    /// Issue a raw secret bound to the account and purpose
    async fn issue_secret(&self, purpose: TokenPurpose, account: &Account) -> AuthResult<String>;

    /// Verify a raw secret against the account and purpose
    async fn verify_secret(
        &self,
        purpose: TokenPurpose,
        account: &Account,
        secret: &str,
    ) -> AuthResult<bool>;
}
