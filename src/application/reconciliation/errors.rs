//! Scheduler errors.

use thiserror::Error;

use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    /// A tick is already in flight.
    #[error("A reconciliation tick is already running")]
    AlreadyRunning,

    /// `start` was called while the timers were running.
    #[error("Scheduler timers are already started")]
    AlreadyStarted,

    /// Loading memberships or settings failed; the tick was aborted.
    #[error("Tick aborted: {0}")]
    Store(#[from] DomainError),
}
