//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::notify::ResendConfig;

/// Email configuration (Resend)
///
/// E-mail is optional: without an API key the channel stays unconfigured.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: Option<SecretString>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Where admin digests go and where member notices go when the member
    /// has no address on file
    pub admin_email: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn is_enabled(&self) -> bool {
        self.resend_api_key.is_some()
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(key) = &self.resend_api_key else {
            return Ok(());
        };
        if key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !key.expose_secret().starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.admin_email.as_ref().is_some_and(|a| !a.contains('@')) {
            return Err(ValidationError::InvalidAdminEmail);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }

    /// Notifier config, or `None` when e-mail is disabled.
    pub fn resend_config(&self) -> Option<ResendConfig> {
        let key = self.resend_api_key.as_ref()?;
        let mut config = ResendConfig::new(key.expose_secret().clone(), self.from_header())
            .with_timeout(std::time::Duration::from_secs(self.timeout_secs));
        if let Some(admin) = &self.admin_email {
            config = config.with_admin_address(admin.clone());
        }
        Some(config)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            admin_email: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@studyhall.local".to_string()
}

fn default_from_name() -> String {
    "Study Hall".to_string()
}

fn default_timeout() -> u64 {
    10
}
