//! ReactivateMembershipHandler - Command handler for bringing back a member who left.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::seating::SeatCoordinator;
use crate::domain::foundation::{MembershipId, SeatNumber};
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{Clock, MembershipStore, SettingsStore};

use super::{claim_seat, priced_slot};

/// Command to reactivate a membership.
#[derive(Debug, Clone)]
pub struct ReactivateMembershipCommand {
    pub membership_id: MembershipId,
    pub seat_number: u32,
    /// Keeps the previous slot when `None`.
    pub slot: Option<String>,
    /// New cycle anchor; defaults to the hall's local date.
    pub registration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ReactivateMembershipResult {
    pub membership: Membership,
}

/// Handler for reactivation.
///
/// The member starts over: a fresh anchor, fee due immediately, and an
/// empty payment ledger.
pub struct ReactivateMembershipHandler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    seating: Arc<SeatCoordinator>,
    clock: Arc<dyn Clock>,
    utc_offset_minutes: i32,
}

impl ReactivateMembershipHandler {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        settings: Arc<dyn SettingsStore>,
        seating: Arc<SeatCoordinator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            memberships,
            settings,
            seating,
            clock,
            utc_offset_minutes: 0,
        }
    }

    /// Take default dates from the hall's local calendar.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub async fn handle(
        &self,
        cmd: ReactivateMembershipCommand,
    ) -> Result<ReactivateMembershipResult, MembershipError> {
        let mut membership = self
            .memberships
            .get(&cmd.membership_id)
            .await?
            .ok_or(MembershipError::not_found(cmd.membership_id))?;

        if membership.is_active() {
            return Err(MembershipError::invalid_state("active", "reactivate"));
        }

        let settings = self.settings.load().await?;
        let seat = SeatNumber::new(cmd.seat_number)?;
        let slot = priced_slot(&settings, cmd.slot.unwrap_or_else(|| membership.slot.to_string()))?;
        let registration_date = cmd
            .registration_date
            .unwrap_or_else(|| self.clock.now().date_at_offset(self.utc_offset_minutes));

        claim_seat(&self.seating, seat, membership.id, &slot).await?;

        membership.reactivate(seat, slot, registration_date)?;
        if let Err(err) = self.memberships.update(&membership).await {
            if let Err(undo) = self.seating.release(seat, membership.id).await {
                warn!(membership_id = %membership.id, seat = %seat, error = %undo, "Failed to undo seat claim");
            }
            return Err(err.into());
        }

        info!(
            membership_id = %membership.id,
            seat = %seat,
            registration_date = %registration_date,
            "Membership reactivated"
        );
        Ok(ReactivateMembershipResult { membership })
    }
}
