//! Seat entity and per-slot occupancy.
//!
//! A seat can be shared by memberships in different daily slots, so
//! occupancy is keyed by `(seat number, slot)` rather than by seat number
//! alone. At most one membership occupies a given seat in a given slot.

use serde::{Deserialize, Serialize};

use crate::domain::billing::FeeStatus;
use crate::domain::foundation::{MembershipId, SeatNumber, Slot, Timestamp};

/// Seat status as shown for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Available,
    Paid,
    Due,
    Expired,
}

impl From<FeeStatus> for SeatStatus {
    fn from(status: FeeStatus) -> Self {
        match status {
            FeeStatus::Paid => SeatStatus::Paid,
            FeeStatus::Due => SeatStatus::Due,
            FeeStatus::Expired => SeatStatus::Expired,
        }
    }
}

/// One membership holding the seat for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub slot: Slot,
    pub owner_id: MembershipId,

    /// Mirrors the owner's fee status.
    pub status: FeeStatus,
}

/// A pre-provisioned seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub number: SeatNumber,
    pub occupancies: Vec<Occupancy>,
    pub updated_at: Timestamp,
}

impl Seat {
    /// Creates an empty seat.
    pub fn new(number: SeatNumber) -> Self {
        Self {
            number,
            occupancies: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Occupancy for `slot`, if any.
    pub fn occupant(&self, slot: &Slot) -> Option<&Occupancy> {
        self.occupancies.iter().find(|o| &o.slot == slot)
    }

    /// Status of the seat for `slot`.
    pub fn status_for(&self, slot: &Slot) -> SeatStatus {
        self.occupant(slot)
            .map(|o| SeatStatus::from(o.status))
            .unwrap_or(SeatStatus::Available)
    }

    /// Returns true if nobody holds the seat in any slot.
    pub fn is_vacant(&self) -> bool {
        self.occupancies.is_empty()
    }

    pub fn is_occupied_by(&self, owner: &MembershipId) -> bool {
        self.occupancies.iter().any(|o| &o.owner_id == owner)
    }

    /// Claim the seat for `owner` in `slot`.
    ///
    /// Re-claiming by the current owner is accepted and refreshes the
    /// status.
    ///
    /// # Errors
    ///
    /// Returns the current occupant's id when another membership already
    /// holds this slot.
    pub fn occupy(
        &mut self,
        slot: Slot,
        owner: MembershipId,
        status: FeeStatus,
    ) -> Result<(), MembershipId> {
        match self.occupancies.iter_mut().find(|o| o.slot == slot) {
            Some(existing) if existing.owner_id != owner => Err(existing.owner_id),
            Some(existing) => {
                existing.status = status;
                self.updated_at = Timestamp::now();
                Ok(())
            }
            None => {
                self.occupancies.push(Occupancy {
                    slot,
                    owner_id: owner,
                    status,
                });
                self.updated_at = Timestamp::now();
                Ok(())
            }
        }
    }

    /// Remove every occupancy held by `owner`.
    ///
    /// Returns `false` when the owner held nothing here.
    pub fn vacate(&mut self, owner: &MembershipId) -> bool {
        let before = self.occupancies.len();
        self.occupancies.retain(|o| &o.owner_id != owner);
        let changed = self.occupancies.len() != before;
        if changed {
            self.updated_at = Timestamp::now();
        }
        changed
    }

    /// Remove `owner`'s occupancy of `slot` only.
    ///
    /// Returns `false` when the owner does not hold that slot.
    pub fn vacate_slot(&mut self, owner: &MembershipId, slot: &Slot) -> bool {
        let before = self.occupancies.len();
        self.occupancies
            .retain(|o| !(&o.owner_id == owner && &o.slot == slot));
        let changed = self.occupancies.len() != before;
        if changed {
            self.updated_at = Timestamp::now();
        }
        changed
    }

    /// Mirror `owner`'s fee status onto its occupancy.
    ///
    /// Returns `false` when the owner holds nothing here.
    pub fn mirror_status(&mut self, owner: &MembershipId, status: FeeStatus) -> bool {
        let mut changed = false;
        for occupancy in self.occupancies.iter_mut().filter(|o| &o.owner_id == owner) {
            occupancy.status = status;
            changed = true;
        }
        if changed {
            self.updated_at = Timestamp::now();
        }
        changed
    }
}
