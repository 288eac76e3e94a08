//! RegisterMembershipHandler - Command handler for seat registration.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::seating::SeatCoordinator;
use crate::domain::foundation::{MembershipId, SeatNumber};
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{Clock, MembershipStore, SettingsStore};

use super::{claim_seat, priced_slot};

/// Command to register a new membership on a seat.
#[derive(Debug, Clone)]
pub struct RegisterMembershipCommand {
    pub name: String,
    pub contact: Option<String>,
    pub seat_number: u32,
    pub slot: String,
    /// Defaults to the hall's local date.
    pub registration_date: Option<NaiveDate>,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterMembershipResult {
    pub membership: Membership,
}

/// Handler for registering memberships.
///
/// The seat is claimed through the SeatCoordinator before the membership is
/// saved; a failed save gives the seat back.
pub struct RegisterMembershipHandler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    seating: Arc<SeatCoordinator>,
    clock: Arc<dyn Clock>,
    utc_offset_minutes: i32,
}

impl RegisterMembershipHandler {
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
        cmd: RegisterMembershipCommand,
    ) -> Result<RegisterMembershipResult, MembershipError> {
        // 1. Validate input
        let settings = self.settings.load().await?;
        let slot = priced_slot(&settings, cmd.slot)?;
        let seat = SeatNumber::new(cmd.seat_number)?;
        let registration_date = cmd
            .registration_date
            .unwrap_or_else(|| self.clock.now().date_at_offset(self.utc_offset_minutes));

        let membership = Membership::register(
            MembershipId::new(),
            cmd.name,
            cmd.contact,
            seat,
            slot.clone(),
            registration_date,
        )?;

        // 2. Claim the seat
        claim_seat(&self.seating, seat, membership.id, &slot).await?;

        // 3. Persist, giving the seat back on failure
        if let Err(err) = self.memberships.save(&membership).await {
            if let Err(release_err) = self.seating.release(seat, membership.id).await {
                warn!(
                    membership_id = %membership.id,
                    seat = %seat,
                    error = %release_err,
                    "Failed to give back seat after save failure"
                );
            }
            return Err(err.into());
        }

        info!(
            membership_id = %membership.id,
            seat = %seat,
            slot = %slot,
            "Membership registered"
        );
        Ok(RegisterMembershipResult { membership })
    }
}
