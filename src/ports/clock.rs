//! Clock port.
//!
//! Lock expiry and tick dates read time through this port so tests can
//! pin the calendar.

use crate::domain::foundation::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
