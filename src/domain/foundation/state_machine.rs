//! Guarded status transitions.

use super::ValidationError;

/// A status enum whose changes are checked against an allowed-move table.
///
/// `FeeStatus` and `MembershipState` implement this; aggregates change
/// status only through [`transition_to`](StateMachine::transition_to).
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns `target` if the move is allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("{:?} cannot move to {:?}", self, target),
            ));
        }
        Ok(target)
    }
}
