//! Membership handlers.
//!
//! Command and query handlers for the membership lifecycle:
//!
//! ## Commands
//! - Registering a membership on a seat
//! - Recording a fee payment
//! - Transferring to another seat or slot
//! - Leaving (admin archive)
//! - Reactivating a membership that left
//!
//! ## Queries
//! - Projected fee history

mod get_fee_history;
mod leave_membership;
mod reactivate_membership;
mod record_payment;
mod register_membership;
mod transfer_seat;

// Commands
pub use leave_membership::{LeaveMembershipCommand, LeaveMembershipHandler, LeaveMembershipResult};
pub use reactivate_membership::{
    ReactivateMembershipCommand, ReactivateMembershipHandler, ReactivateMembershipResult,
};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult};
pub use register_membership::{
    RegisterMembershipCommand, RegisterMembershipHandler, RegisterMembershipResult,
};
pub use transfer_seat::{TransferSeatCommand, TransferSeatHandler, TransferSeatResult};

// Queries
pub use get_fee_history::{GetFeeHistoryHandler, GetFeeHistoryQuery, GetFeeHistoryResult};

use crate::application::seating::{ReservationOutcome, SeatCoordinator, SeatError};
use crate::domain::foundation::{MembershipId, SeatNumber, Slot, ValidationError};
use crate::domain::membership::MembershipError;
use crate::ports::HallSettings;

impl From<SeatError> for MembershipError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::NotFound(seat) => MembershipError::SeatNotFound(seat),
            SeatError::Store(err) => MembershipError::infrastructure(err.to_string()),
        }
    }
}

/// Parse a slot name and require a configured price for it.
fn priced_slot(settings: &HallSettings, raw: impl Into<String>) -> Result<Slot, MembershipError> {
    let slot = Slot::new(raw)?;
    if !settings.price_table.contains(&slot) {
        return Err(ValidationError::unknown_slot(slot.as_str()).into());
    }
    Ok(slot)
}

/// Claim `seat` in `slot`, mapping a conflict to `SeatUnavailable`.
async fn claim_seat(
    seating: &SeatCoordinator,
    seat: SeatNumber,
    claimant: MembershipId,
    slot: &Slot,
) -> Result<(), MembershipError> {
    match seating.reserve(seat, claimant, slot).await? {
        ReservationOutcome::Reserved => Ok(()),
        ReservationOutcome::Conflict { .. } => {
            Err(MembershipError::seat_unavailable(seat, slot.clone()))
        }
    }
}
