//! Scheduled reconciliation of fee status, notices, and seats.

mod config;
mod errors;
mod report;
mod scheduler;

pub use config::SchedulerConfig;
pub use errors::SchedulerError;
pub use report::{SchedulerStatus, TickReport};
pub use scheduler::ReconciliationScheduler;
