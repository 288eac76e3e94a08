//! Seat provisioning and lock configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::seating::SeatCoordinatorConfig;

const MAX_CAPACITY: u32 = 10_000;

/// Seat configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeatsConfig {
    /// Number of seats provisioned at startup, numbered from 1
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    /// How long an in-flight claim holds the seat lock
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_secs: u64,

    /// How long the lock is kept after a successful claim
    #[serde(default = "default_hold")]
    pub hold_after_success_secs: u64,
}

impl SeatsConfig {
    /// Validate seat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ValidationError::InvalidCapacity { max: MAX_CAPACITY });
        }
        if self.lock_timeout_secs == 0 {
            return Err(ValidationError::InvalidInterval("lock_timeout_secs"));
        }
        if self.hold_after_success_secs > self.lock_timeout_secs {
            return Err(ValidationError::InvalidInterval("hold_after_success_secs"));
        }
        Ok(())
    }

    pub fn coordinator_config(&self) -> SeatCoordinatorConfig {
        SeatCoordinatorConfig::default()
            .with_lock_timeout(Duration::from_secs(self.lock_timeout_secs))
            .with_hold_after_success(Duration::from_secs(self.hold_after_success_secs))
    }
}

impl Default for SeatsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            lock_timeout_secs: default_lock_timeout(),
            hold_after_success_secs: default_hold(),
        }
    }
}

fn default_capacity() -> u32 {
    100
}

fn default_lock_timeout() -> u64 {
    30
}

fn default_hold() -> u64 {
    3
}
