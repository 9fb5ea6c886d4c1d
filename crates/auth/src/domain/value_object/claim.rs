use serde::{Deserialize, Serialize};

/// A (kind, value) claim attached to an account
///
/// Registration records an email claim and a surname claim; further
/// claims are granted administratively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub const EMAIL: &'static str = "email";
    pub const SURNAME: &'static str = "surname";

    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Email claim
    pub fn email(value: impl Into<String>) -> Self {
        Self::new(Self::EMAIL, value)
    }

    /// Surname claim
    pub fn surname(value: impl Into<String>) -> Self {
        Self::new(Self::SURNAME, value)
    }
}
