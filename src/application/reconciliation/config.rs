//! Scheduler timing and window configuration.

use chrono::{Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use std::time::Duration;

use crate::domain::foundation::Timestamp;

/// Configuration for the ReconciliationScheduler.
///
/// | Setting | Default | Description |
/// |---------|---------|-------------|
/// | `daily_at` | 09:00 | Local time of the daily tick |
/// | `utc_offset_minutes` | 0 | Offset that defines "local" and "today" |
/// | `backup_interval` | 4h | Fixed-rate backup tick |
/// | `reminder_days` | 3 | Days before the due date a reminder goes out |
/// | `termination_grace_days` | 3 | Days past the due date before the seat is reclaimed |
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub daily_at: NaiveTime,
    pub utc_offset_minutes: i32,
    pub backup_interval: Duration,
    pub reminder_days: i64,
    pub termination_grace_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            utc_offset_minutes: 0,
            backup_interval: Duration::from_secs(4 * 60 * 60),
            reminder_days: 3,
            termination_grace_days: 3,
        }
    }
}

impl SchedulerConfig {
    pub fn with_daily_at(mut self, at: NaiveTime) -> Self {
        self.daily_at = at;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_backup_interval(mut self, interval: Duration) -> Self {
        self.backup_interval = interval;
        self
    }

    pub fn with_reminder_days(mut self, days: i64) -> Self {
        self.reminder_days = days;
        self
    }

    pub fn with_termination_grace_days(mut self, days: i64) -> Self {
        self.termination_grace_days = days;
        self
    }

    /// First daily run strictly after `now`.
    pub fn next_daily_run(&self, now: Timestamp) -> Timestamp {
        let offset = ChronoDuration::minutes(i64::from(self.utc_offset_minutes));
        let local = now.as_datetime().naive_utc() + offset;

        let mut candidate = local.date().and_time(self.daily_at);
        if candidate <= local {
            candidate += ChronoDuration::days(1);
        }
        Timestamp::from_datetime(Utc.from_utc_datetime(&(candidate - offset)))
    }
}
