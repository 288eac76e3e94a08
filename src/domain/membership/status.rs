//! Membership lifecycle state.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Whether the member still occupies the hall.
///
/// Independent of [`FeeStatus`](crate::domain::billing::FeeStatus): an
/// active member may be expired on fees until the scheduler terminates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// Holds a seat and is billed.
    Active,

    /// Archived: left voluntarily, removed by an admin, or terminated for
    /// non-payment. The seat has been released.
    Left,
}

impl StateMachine for MembershipState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipState::*;
        matches!((self, target), (Active, Left) | (Left, Active))
    }
}
