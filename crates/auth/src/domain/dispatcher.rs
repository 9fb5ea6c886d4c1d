//! Notification Dispatcher Port
//!
//! Outbound email as the core sees it: one composed message, one
//! synchronous attempt, success observed as a boolean. Transport faults
//! surface as `DispatchError` and are converted to `DeliveryFailed` at
//! the call site.

use thiserror::Error;

/// A composed outbound email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

impl EmailMessage {
    /// HTML message
    pub fn html(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            is_html: true,
        }
    }
}

/// Transport-level dispatch fault
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail transport timed out")]
    Timeout,
}

/// Notification dispatcher trait
///
/// `Ok(false)` means the transport reported non-delivery without
/// faulting; callers treat it the same as `Err(_)`.
#[trait_variant::make(NotificationDispatcher: Send)]
pub trait LocalNotificationDispatcher {
    async fn send(&self, message: &EmailMessage) -> Result<bool, DispatchError>;
}
