//! TransferSeatHandler - Command handler for moving a member to another seat or slot.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::seating::SeatCoordinator;
use crate::domain::foundation::{MembershipId, SeatNumber};
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{MembershipStore, SettingsStore};

use super::{claim_seat, priced_slot};

/// Command to move a membership.
#[derive(Debug, Clone)]
pub struct TransferSeatCommand {
    pub membership_id: MembershipId,
    pub to_seat: u32,
    /// Keeps the current slot when `None`.
    pub to_slot: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransferSeatResult {
    pub membership: Membership,
    /// False when the target was the current seat and slot.
    pub moved: bool,
}

/// Handler for seat transfers.
///
/// The new seat is claimed before the old one is given up, so a failed
/// transfer leaves the member where they were.
pub struct TransferSeatHandler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    seating: Arc<SeatCoordinator>,
}

impl TransferSeatHandler {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        settings: Arc<dyn SettingsStore>,
        seating: Arc<SeatCoordinator>,
    ) -> Self {
        Self {
            memberships,
            settings,
            seating,
        }
    }

    pub async fn handle(&self, cmd: TransferSeatCommand) -> Result<TransferSeatResult, MembershipError> {
        let mut membership = self
            .memberships
            .get(&cmd.membership_id)
            .await?
            .ok_or(MembershipError::not_found(cmd.membership_id))?;

        if !membership.is_active() {
            return Err(MembershipError::invalid_state("left", "transfer seat for"));
        }

        let to_seat = SeatNumber::new(cmd.to_seat)?;
        let to_slot = match cmd.to_slot {
            Some(raw) => priced_slot(&self.settings.load().await?, raw)?,
            None => membership.slot.clone(),
        };

        if to_seat == membership.seat_number && to_slot == membership.slot {
            return Ok(TransferSeatResult {
                membership,
                moved: false,
            });
        }

        let (from_seat, from_slot) = (membership.seat_number, membership.slot.clone());

        // 1. Claim the target
        claim_seat(&self.seating, to_seat, membership.id, &to_slot).await?;

        // 2. Point the membership at it
        membership.move_to(to_seat, to_slot.clone())?;
        if let Err(err) = self.memberships.update(&membership).await {
            if let Err(undo) = self.seating.release_slot(to_seat, membership.id, &to_slot).await {
                warn!(membership_id = %membership.id, seat = %to_seat, error = %undo, "Failed to undo seat claim");
            }
            return Err(err.into());
        }

        // 3. Give up the old occupancy and carry the fee status over
        if let Err(err) = self
            .seating
            .release_slot(from_seat, membership.id, &from_slot)
            .await
        {
            warn!(membership_id = %membership.id, seat = %from_seat, error = %err, "Failed to release previous seat");
        }
        if let Err(err) = self
            .seating
            .mirror_status(to_seat, membership.id, membership.fee_status)
            .await
        {
            warn!(membership_id = %membership.id, seat = %to_seat, error = %err, "Failed to mirror fee status onto new seat");
        }

        info!(
            membership_id = %membership.id,
            from_seat = %from_seat,
            from_slot = %from_slot,
            to_seat = %to_seat,
            to_slot = %to_slot,
            "Seat transferred"
        );
        Ok(TransferSeatResult {
            membership,
            moved: true,
        })
    }
}
