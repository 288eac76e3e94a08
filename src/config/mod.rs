//! Application configuration module
//!
//! Type-safe configuration loading using the `config` and `dotenvy` crates.
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults on every section
//! 2. An optional `study-hall.{toml,yaml,json}` file in the working directory
//! 3. Environment variables with the `STUDY_HALL` prefix
//!
//! # Example
//!
//! ```no_run
//! use study_hall::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Provisioning {} seats", config.seats.capacity);
//! ```

mod chat;
mod email;
mod error;
mod logging;
mod pricing;
mod scheduler;
mod seats;
mod templates;

pub use chat::ChatConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use pricing::PricingConfig;
pub use scheduler::SchedulerSettings;
pub use seats::SeatsConfig;
pub use templates::TemplatesConfig;

use serde::Deserialize;

/// Base name of the optional configuration file.
const CONFIG_FILE: &str = "study-hall";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration with notifications disabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Daily tick timing and notice windows
    #[serde(default)]
    pub scheduler: SchedulerSettings,

    /// Seat capacity and claim locks
    #[serde(default)]
    pub seats: SeatsConfig,

    /// Slot prices
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Chat webhook configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Notice wording overrides
    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the config file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `study-hall.*` if present
    /// 3. Reads environment variables with `STUDY_HALL` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `STUDY_HALL__SEATS__CAPACITY=60` -> `seats.capacity = 60`
    /// - `STUDY_HALL__SCHEDULER__DAILY_AT=08:30` -> `scheduler.daily_at = "08:30"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::default()
                    .prefix("STUDY_HALL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scheduler.validate()?;
        self.seats.validate()?;
        self.pricing.validate()?;
        self.email.validate()?;
        self.chat.validate()?;
        self.templates.validate()?;
        Ok(())
    }

    /// True when at least one notification channel is enabled.
    pub fn notifications_enabled(&self) -> bool {
        self.email.is_enabled() || self.chat.is_enabled()
    }
}
