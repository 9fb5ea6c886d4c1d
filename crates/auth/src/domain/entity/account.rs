//! Account Entity
//!
//! The single principal type of the system: identity, credentials, and
//! confirmation/lockout state in one aggregate.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, claim::Claim, email::Email, password::PasswordHash, role::Role,
};

/// Account entity
///
/// Created unconfirmed by registration; becomes able to authenticate only
/// after email confirmation. The `security_stamp` is bound into every
/// single-use token issued for the account and rotates on each
/// credential-relevant change, invalidating outstanding tokens.
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Username, always the lower-cased email
    pub username: String,
    /// Email address
    pub email: Email,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Hashed password
    pub password_hash: PasswordHash,
    /// Whether the email address has been confirmed
    pub email_confirmed: bool,
    /// Consecutive login failure count
    pub failed_login_count: u16,
    /// Account locked until (set once the failure threshold is exceeded)
    pub lockout_until: Option<DateTime<Utc>>,
    /// Rotating stamp bound into single-use tokens
    pub security_stamp: String,
    /// Roles held
    pub roles: Vec<Role>,
    /// Claims held
    pub claims: Vec<Claim>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unconfirmed account
    ///
    /// Roles are granted separately through the store; registration
    /// records the email and surname claims.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Email,
        password_hash: PasswordHash,
    ) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let claims = vec![Claim::email(email.as_str()), Claim::surname(&last_name)];

        Self {
            account_id: AccountId::new(),
            username: email.as_str().to_string(),
            email,
            first_name,
            last_name,
            password_hash,
            email_confirmed: false,
            failed_login_count: 0,
            lockout_until: None,
            security_stamp: platform::crypto::random_stamp(),
            roles: Vec::new(),
            claims,
            created_at: Utc::now(),
        }
    }

    /// Display name used in notifications and session claims
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check if the account is currently locked out
    pub fn is_locked_out(&self) -> bool {
        if let Some(until) = self.lockout_until {
            Utc::now() < until
        } else {
            false
        }
    }

    /// Check if the account holds a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Mark the email as confirmed and rotate the security stamp,
    /// invalidating outstanding confirmation tokens
    pub fn confirm_email(&mut self) {
        self.email_confirmed = true;
        self.security_stamp = platform::crypto::random_stamp();
    }

    /// Replace the password hash and rotate the security stamp,
    /// invalidating outstanding reset tokens
    pub fn set_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.security_stamp = platform::crypto::random_stamp();
    }
}
