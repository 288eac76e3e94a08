//! Fee status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracked fee status of a membership.
///
/// The stored value is advanced by payments and by the reconciliation
/// scheduler; it is never derived live from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    /// Current cycle is paid and the due date lies ahead.
    Paid,

    /// The due date is today.
    Due,

    /// The due date has passed without payment.
    Expired,
}

impl FeeStatus {
    /// Position in the forward lifecycle, used to ignore backwards syncs.
    pub fn severity(&self) -> u8 {
        match self {
            FeeStatus::Paid => 0,
            FeeStatus::Due => 1,
            FeeStatus::Expired => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Paid => "paid",
            FeeStatus::Due => "due",
            FeeStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for FeeStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FeeStatus::*;
        matches!(
            (self, target),
            // From PAID
            (Paid, Paid) // Early renewal
                | (Paid, Due)
                | (Paid, Expired) // Due day passed between ticks
            // From DUE
                | (Due, Paid)
                | (Due, Expired)
            // From EXPIRED
                | (Expired, Paid) // Late payment before termination
                | (Expired, Expired)
        )
    }
}
