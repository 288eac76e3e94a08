//! Tick reports and scheduler status.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{MembershipId, SeatNumber, Timestamp};

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Local calendar date the tick classified against.
    pub date: Option<NaiveDate>,

    /// Active memberships examined.
    pub examined: usize,

    /// Fee statuses advanced by the status sync.
    pub status_changes: usize,

    pub reminders_sent: usize,
    pub due_notices_sent: usize,

    /// Memberships terminated and seats reclaimed.
    pub terminated: Vec<(MembershipId, SeatNumber)>,

    /// Notices not sent because no channel is configured.
    pub notices_skipped: usize,

    /// Per-membership failures that were logged and skipped.
    pub failures: usize,

    pub admin_digest_sent: bool,
}

impl TickReport {
    pub fn terminated_count(&self) -> usize {
        self.terminated.len()
    }
}

/// Externally visible scheduler health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    /// Timers are started.
    pub running: bool,

    /// A tick is in flight.
    pub active: bool,

    pub last_tick_at: Option<Timestamp>,
    pub next_scheduled_at: Option<Timestamp>,
    pub last_report: Option<TickReport>,
}
