//! Resend e-mail notifier.
//!
//! Delivers notices as plain-text e-mail through the Resend HTTP API.
//! Member notices go to the membership's contact address; admin digests and
//! notices for members without an address go to the configured admin
//! address.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::new(api_key, "Study Hall <desk@hall.example>")
//!     .with_admin_address("owner@hall.example")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let notifier = ResendEmailNotifier::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::{Notification, NotificationCategory};
use crate::ports::Notifier;

const RESEND_BASE_URL: &str = "https://api.resend.com";

/// Configuration for the Resend notifier.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    api_key: Secret<String>,
    /// Formatted `From` header, e.g. `Study Hall <desk@hall.example>`.
    pub from: String,
    pub admin_address: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from: from.into(),
            admin_address: None,
            base_url: RESEND_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_admin_address(mut self, address: impl Into<String>) -> Self {
        self.admin_address = Some(address.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'static str,
    text: &'a str,
}

/// Notifier backed by the Resend e-mail API.
pub struct ResendEmailNotifier {
    config: ResendConfig,
    client: Client,
}

impl ResendEmailNotifier {
    /// # Errors
    ///
    /// Returns `InternalError` if the HTTP client cannot be built.
    pub fn new(config: ResendConfig) -> Result<Self, DomainError> {
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

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }

    /// Address a notification is delivered to.
    fn recipient_for<'a>(&'a self, notification: &'a Notification) -> Option<&'a str> {
        if notification.category == NotificationCategory::Admin {
            return self.config.admin_address.as_deref();
        }
        notification
            .recipient
            .as_deref()
            .or(self.config.admin_address.as_deref())
    }

    fn build_request<'a>(&'a self, notification: &'a Notification) -> Option<SendEmailRequest<'a>> {
        let to = self.recipient_for(notification)?;
        Some(SendEmailRequest {
            from: &self.config.from,
            to: vec![to],
            subject: subject_for(notification.category),
            text: &notification.body,
        })
    }
}

fn subject_for(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::Reminder => "Your seat fee is due soon",
        NotificationCategory::Due => "Your seat fee is due",
        NotificationCategory::Overdue => "Your seat has been released",
        NotificationCategory::Payment => "Payment received",
        NotificationCategory::Admin => "Study hall daily summary",
    }
}

fn delivery_failed(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::NotificationFailed, message).with_detail("channel", "email")
}

#[async_trait]
impl Notifier for ResendEmailNotifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let Some(request) = self.build_request(notification) else {
            debug!(
                category = %notification.category,
                "No e-mail address for notification, skipping"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    delivery_failed(format!(
                        "Resend request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    delivery_failed(format!("Resend request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(delivery_failed(format!("Resend returned {}: {}", status.as_u16(), body)))
    }
}
