//! Chat webhook notifier.
//!
//! Posts every notice to an operator chat channel as `{"text": "..."}`,
//! the payload shape accepted by Slack-compatible incoming webhooks.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::{Notification, NotificationCategory};
use crate::ports::Notifier;

/// Webhook endpoint and timeout.
///
/// The URL usually embeds a token, so it is kept secret.
#[derive(Debug, Clone)]
pub struct ChatWebhookConfig {
    url: Secret<String>,
    pub timeout: Duration,
}

impl ChatWebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Secret::new(url.into()),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct WebhookMessage {
    text: String,
}

/// Notifier that relays notices to a chat webhook.
pub struct ChatWebhookNotifier {
    config: ChatWebhookConfig,
    client: Client,
}

impl ChatWebhookNotifier {
    /// # Errors
    ///
    /// Returns `InternalError` if the HTTP client cannot be built.
    pub fn new(config: ChatWebhookConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }
}

fn message_for(notification: &Notification) -> WebhookMessage {
    let text = match (&notification.recipient, notification.category) {
        (_, NotificationCategory::Admin) | (None, _) => {
            format!("[{}] {}", notification.category, notification.body)
        }
        (Some(to), category) => format!("[{}] to {}: {}", category, to, notification.body),
    };
    WebhookMessage { text }
}

#[async_trait]
impl Notifier for ChatWebhookNotifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.config.url.expose_secret())
            .json(&message_for(notification))
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationFailed,
                    format!("Chat webhook request failed: {}", e),
                )
                .with_detail("channel", "chat")
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(DomainError::new(
            ErrorCode::NotificationFailed,
            format!("Chat webhook returned {}", status.as_u16()),
        )
        .with_detail("channel", "chat"))
    }
}
