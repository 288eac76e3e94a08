//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid daily run time '{0}', expected HH:MM")]
    InvalidDailyTime(String),

    #[error("UTC offset must be within ±14 hours")]
    InvalidUtcOffset,

    #[error("Invalid interval for {0}")]
    InvalidInterval(&'static str),

    #[error("Invalid window for {0}")]
    InvalidWindow(&'static str),

    #[error("Seat capacity must be between 1 and {max}")]
    InvalidCapacity { max: u32 },

    #[error("Invalid price for slot '{0}'")]
    InvalidPrice(String),

    #[error("No slots are priced")]
    NoPricedSlots,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid admin email address")]
    InvalidAdminEmail,

    #[error("Chat webhook URL must use HTTP(S)")]
    InvalidWebhookUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Template for {0} is blank")]
    BlankTemplate(&'static str),
}
