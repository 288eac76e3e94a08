//! Reconciliation scheduler configuration

use chrono::NaiveTime;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::reconciliation::SchedulerConfig;

/// Largest UTC offset in use anywhere (UTC+14).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Scheduler timing and notice windows
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Local time of the daily tick, `HH:MM`
    #[serde(default = "default_daily_at")]
    pub daily_at: String,

    /// Offset from UTC that defines the local day
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Backup tick period in seconds
    #[serde(default = "default_backup_interval")]
    pub backup_interval_secs: u64,

    /// Days before the due date a reminder goes out
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i64,

    /// Days past the due date before the seat is reclaimed
    #[serde(default = "default_grace_days")]
    pub termination_grace_days: i64,
}

impl SchedulerSettings {
    /// Parsed daily run time.
    pub fn daily_time(&self) -> Result<NaiveTime, ValidationError> {
        NaiveTime::parse_from_str(self.daily_at.trim(), "%H:%M")
            .map_err(|_| ValidationError::InvalidDailyTime(self.daily_at.clone()))
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.daily_time()?;
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidUtcOffset);
        }
        if self.backup_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("backup_interval_secs"));
        }
        if self.reminder_days < 1 {
            return Err(ValidationError::InvalidWindow("reminder_days"));
        }
        if self.termination_grace_days < 1 {
            return Err(ValidationError::InvalidWindow("termination_grace_days"));
        }
        Ok(())
    }

    /// Build the runtime scheduler config.
    pub fn to_scheduler_config(&self) -> Result<SchedulerConfig, ValidationError> {
        Ok(SchedulerConfig::default()
            .with_daily_at(self.daily_time()?)
            .with_utc_offset_minutes(self.utc_offset_minutes)
            .with_backup_interval(Duration::from_secs(self.backup_interval_secs))
            .with_reminder_days(self.reminder_days)
            .with_termination_grace_days(self.termination_grace_days))
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            daily_at: default_daily_at(),
            utc_offset_minutes: 0,
            backup_interval_secs: default_backup_interval(),
            reminder_days: default_reminder_days(),
            termination_grace_days: default_grace_days(),
        }
    }
}

fn default_daily_at() -> String {
    "09:00".to_string()
}

fn default_backup_interval() -> u64 {
    4 * 60 * 60
}

fn default_reminder_days() -> i64 {
    3
}

fn default_grace_days() -> i64 {
    3
}
