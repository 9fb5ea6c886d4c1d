//! Notification Dispatcher Implementations
//!
//! `HttpMailer` hands composed messages to an HTTP mail relay with a
//! hard timeout so a slow transport cannot stall a flow. `MockMailer`
//! records messages for tests.

use std::time::Duration;

use serde_json::json;

use crate::domain::dispatcher::{DispatchError, EmailMessage, NotificationDispatcher};

/// Mail relay configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// HTTP endpoint of the mail relay
    pub endpoint: String,
    /// Optional bearer token for the relay
    pub api_key: Option<String>,
    /// Sender address
    pub from_address: String,
    /// Sender display name
    pub from_name: String,
    /// Hard per-request timeout
    pub timeout: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8025/api/send".to_string(),
            api_key: None,
            from_address: "no-reply@example.com".to_string(),
            from_name: "Identity Service".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP relay mailer
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

impl NotificationDispatcher for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<bool, DispatchError> {
        let body_field = if message.is_html { "html" } else { "text" };

        let mut payload = json!({
            "from": {
                "email": self.config.from_address,
                "name": self.config.from_name,
            },
            "to": [{ "email": message.to }],
            "subject": message.subject,
        });
        payload[body_field] = json!(message.body);

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout
            } else {
                DispatchError::Transport(e.to_string())
            }
        })?;

        if response.status().is_success() {
            tracing::debug!(to = %message.to, "Mail accepted by relay");
            Ok(true)
        } else {
            tracing::warn!(
                to = %message.to,
                status = %response.status(),
                "Mail relay rejected message"
            );
            Ok(false)
        }
    }
}

// ============================================================================
// Mock mailer (for tests and local development)
// ============================================================================

/// Recording mailer with a configurable outcome
#[derive(Default)]
pub struct MockMailer {
    sent: std::sync::Mutex<Vec<EmailMessage>>,
    outcome: MockOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum MockOutcome {
    #[default]
    Delivered,
    /// Transport reports non-delivery without faulting
    Rejected,
    /// Transport faults
    Faulting,
}

impl MockMailer {
    /// Every send succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send returns `Ok(false)`
    pub fn rejecting() -> Self {
        Self {
            outcome: MockOutcome::Rejected,
            ..Self::default()
        }
    }

    /// Every send returns a transport fault
    pub fn failing() -> Self {
        Self {
            outcome: MockOutcome::Faulting,
            ..Self::default()
        }
    }

    /// Messages handed to this mailer so far (including failed sends)
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mock mailer lock poisoned").clone()
    }
}

impl NotificationDispatcher for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<bool, DispatchError> {
        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .push(message.clone());

        match self.outcome {
            MockOutcome::Delivered => Ok(true),
            MockOutcome::Rejected => Ok(false),
            MockOutcome::Faulting => Err(DispatchError::Transport("mock failure".to_string())),
        }
    }
}
