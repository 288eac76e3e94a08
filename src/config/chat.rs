//! Chat webhook configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::notify::ChatWebhookConfig;

/// Chat webhook configuration. Disabled when no URL is set.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Incoming webhook URL; treated as a secret since it embeds a token
    pub webhook_url: Option<SecretString>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ChatConfig {
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(url) = &self.webhook_url else {
            return Ok(());
        };
        let url = url.expose_secret();
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ValidationError::InvalidWebhookUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn webhook_config(&self) -> Option<ChatWebhookConfig> {
        let url = self.webhook_url.as_ref()?;
        Some(
            ChatWebhookConfig::new(url.expose_secret().clone())
                .with_timeout(Duration::from_secs(self.timeout_secs)),
        )
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
