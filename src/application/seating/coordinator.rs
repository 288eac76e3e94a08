//! SeatCoordinator - arbitration of concurrent seat claims.
//!
//! Registration is a multi-step write (check the seat, write the owner,
//! confirm). Two requests for the same seat can interleave between those
//! steps, so every claim first takes a short in-process lock on the seat
//! number.
//!
//! ## Lock lifecycle
//!
//! | Phase | Lock expires at |
//! |-------|-----------------|
//! | Claim in flight | `acquired_at + lock_timeout` |
//! | After a successful write | `now + hold_after_success` |
//!
//! Expired locks are swept lazily whenever the arena is touched. A claim
//! never waits for another claimant; it gets a conflict immediately.
//!
//! The arena mutex is never held across a store call. Every read-modify-write
//! of a seat record (claim, release, status mirror) runs under that seat's
//! writer mutex, so a release never overwrites a claim landing on another
//! slot of the same seat.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::billing::FeeStatus;
use crate::domain::foundation::{MembershipId, SeatNumber, Slot, Timestamp};
use crate::ports::{Clock, SeatStore};

use super::SeatError;

/// Lock timing for the coordinator.
#[derive(Debug, Clone)]
pub struct SeatCoordinatorConfig {
    /// Age after which an in-flight lock is treated as abandoned.
    pub lock_timeout: Duration,

    /// How long a lock lingers after a successful claim.
    pub hold_after_success: Duration,
}

impl Default for SeatCoordinatorConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(30),
            hold_after_success: Duration::from_secs(3),
        }
    }
}

impl SeatCoordinatorConfig {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_hold_after_success(mut self, hold: Duration) -> Self {
        self.hold_after_success = hold;
        self
    }
}

/// Result of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// The claimant now occupies the seat for the requested slot.
    Reserved,

    /// Someone else holds the seat (lock holder or occupant).
    Conflict { occupant: MembershipId },
}

impl ReservationOutcome {
    pub fn is_reserved(&self) -> bool {
        matches!(self, ReservationOutcome::Reserved)
    }
}

/// Diagnostic view of a seat's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockStatus {
    pub locked: bool,
    pub holder: Option<MembershipId>,
    pub slot: Option<Slot>,
    pub remaining: Option<Duration>,
}

impl LockStatus {
    fn unlocked() -> Self {
        Self {
            locked: false,
            holder: None,
            slot: None,
            remaining: None,
        }
    }
}

#[derive(Debug, Clone)]
struct SeatLock {
    holder: MembershipId,
    slot: Slot,
    acquired_at: Timestamp,
    expires_at: Timestamp,
}

impl SeatLock {
    fn is_expired(&self, now: &Timestamp) -> bool {
        !self.expires_at.is_after(now)
    }
}

/// Serializes seat claims per seat number.
pub struct SeatCoordinator {
    seats: Arc<dyn SeatStore>,
    clock: Arc<dyn Clock>,
    config: SeatCoordinatorConfig,
    locks: Mutex<HashMap<SeatNumber, SeatLock>>,
    writers: Mutex<HashMap<SeatNumber, Arc<Mutex<()>>>>,
}

impl SeatCoordinator {
    pub fn new(seats: Arc<dyn SeatStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(seats, clock, SeatCoordinatorConfig::default())
    }

    pub fn with_config(
        seats: Arc<dyn SeatStore>,
        clock: Arc<dyn Clock>,
        config: SeatCoordinatorConfig,
    ) -> Self {
        Self {
            seats,
            clock,
            config,
            locks: Mutex::new(HashMap::new()),
            writers: Mutex::new(HashMap::new()),
        }
    }

    /// Claim `seat` in `slot` for `claimant`.
    ///
    /// Re-claiming a slot the claimant already occupies is `Reserved`.
    ///
    /// # Errors
    ///
    /// - `SeatError::NotFound` when the seat was never provisioned
    /// - `SeatError::Store` when the seat cannot be read or written
    pub async fn reserve(
        &self,
        seat: SeatNumber,
        claimant: MembershipId,
        slot: &Slot,
    ) -> Result<ReservationOutcome, SeatError> {
        if let Some(holder) = self.try_lock(seat, claimant, slot).await {
            debug!(seat = %seat, holder = %holder, claimant = %claimant, "Seat lock held by another claimant");
            return Ok(ReservationOutcome::Conflict { occupant: holder });
        }

        let outcome = match self.claim(seat, claimant, slot).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.unlock(seat, claimant).await;
                return Err(err);
            }
        };

        match outcome {
            ReservationOutcome::Reserved => {
                self.hold(seat, claimant).await;
                debug!(seat = %seat, slot = %slot.as_str(), claimant = %claimant, "Seat reserved");
            }
            ReservationOutcome::Conflict { occupant } => {
                self.unlock(seat, claimant).await;
                warn!(seat = %seat, slot = %slot.as_str(), occupant = %occupant, "Seat already occupied");
            }
        }

        Ok(outcome)
    }

    /// Clear `claimant`'s occupancy of `seat` and drop its lock.
    ///
    /// A lock held by another claimant is left alone.
    ///
    /// Returns `false` when the claimant does not occupy the seat.
    ///
    /// # Errors
    ///
    /// - `SeatError::NotFound` when the seat was never provisioned
    /// - `SeatError::Store` when the seat cannot be read or written
    pub async fn release(&self, seat: SeatNumber, claimant: MembershipId) -> Result<bool, SeatError> {
        self.vacate(seat, claimant, None).await
    }

    /// Like [`release`](Self::release), but only for one slot.
    ///
    /// Used when a member moves between slots of the same seat.
    ///
    /// # Errors
    ///
    /// Same as [`release`](Self::release).
    pub async fn release_slot(
        &self,
        seat: SeatNumber,
        claimant: MembershipId,
        slot: &Slot,
    ) -> Result<bool, SeatError> {
        self.vacate(seat, claimant, Some(slot)).await
    }

    /// Copy `owner`'s fee status onto its occupancy of `seat`.
    ///
    /// Returns `false` when the owner holds nothing on the seat.
    ///
    /// # Errors
    ///
    /// - `SeatError::NotFound` when the seat was never provisioned
    /// - `SeatError::Store` when the seat cannot be read or written
    pub async fn mirror_status(
        &self,
        seat: SeatNumber,
        owner: MembershipId,
        status: FeeStatus,
    ) -> Result<bool, SeatError> {
        let writer = self.writer(seat).await;
        let _write = writer.lock().await;

        let mut record = self.seats.get(seat).await?.ok_or(SeatError::NotFound(seat))?;
        if !record.mirror_status(&owner, status) {
            return Ok(false);
        }
        self.seats.update(&record).await?;
        Ok(true)
    }

    /// Current lock on `seat`, if any.
    pub async fn lock_status(&self, seat: SeatNumber) -> LockStatus {
        let now = self.clock.now();
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| !lock.is_expired(&now));

        match locks.get(&seat) {
            Some(lock) => LockStatus {
                locked: true,
                holder: Some(lock.holder),
                slot: Some(lock.slot.clone()),
                remaining: lock.expires_at.duration_since(&now).to_std().ok(),
            },
            None => LockStatus::unlocked(),
        }
    }

    async fn vacate(
        &self,
        seat: SeatNumber,
        claimant: MembershipId,
        slot: Option<&Slot>,
    ) -> Result<bool, SeatError> {
        let writer = self.writer(seat).await;
        let _write = writer.lock().await;

        let mut record = self.seats.get(seat).await?.ok_or(SeatError::NotFound(seat))?;
        let vacated = match slot {
            Some(slot) => record.vacate_slot(&claimant, slot),
            None => record.vacate(&claimant),
        };
        if !vacated {
            return Ok(false);
        }
        self.seats.update(&record).await?;

        self.unlock(seat, claimant).await;
        debug!(seat = %seat, claimant = %claimant, "Seat released");
        Ok(true)
    }

    /// Sweep expired locks, then take the lock for `claimant`.
    ///
    /// Returns the other holder if the seat is locked by someone else.
    async fn try_lock(&self, seat: SeatNumber, claimant: MembershipId, slot: &Slot) -> Option<MembershipId> {
        let now = self.clock.now();
        let mut locks = self.locks.lock().await;

        locks.retain(|number, lock| {
            let expired = lock.is_expired(&now);
            if expired {
                debug!(
                    seat = %number,
                    holder = %lock.holder,
                    age_ms = now.duration_since(&lock.acquired_at).num_milliseconds(),
                    "Dropping expired seat lock"
                );
            }
            !expired
        });

        if let Some(existing) = locks.get(&seat) {
            if existing.holder != claimant {
                return Some(existing.holder);
            }
        }

        locks.insert(
            seat,
            SeatLock {
                holder: claimant,
                slot: slot.clone(),
                acquired_at: now,
                expires_at: now.plus_std(self.config.lock_timeout),
            },
        );
        None
    }

    /// Re-read the seat and write the occupancy if the slot is free.
    async fn claim(
        &self,
        seat: SeatNumber,
        claimant: MembershipId,
        slot: &Slot,
    ) -> Result<ReservationOutcome, SeatError> {
        let writer = self.writer(seat).await;
        let _write = writer.lock().await;

        let mut record = self.seats.get(seat).await?.ok_or(SeatError::NotFound(seat))?;

        match record.occupant(slot) {
            Some(occupancy) if occupancy.owner_id == claimant => {
                return Ok(ReservationOutcome::Reserved);
            }
            Some(occupancy) => {
                return Ok(ReservationOutcome::Conflict {
                    occupant: occupancy.owner_id,
                });
            }
            None => {}
        }

        if let Err(occupant) = record.occupy(slot.clone(), claimant, FeeStatus::Due) {
            return Ok(ReservationOutcome::Conflict { occupant });
        }
        self.seats.update(&record).await?;
        Ok(ReservationOutcome::Reserved)
    }

    async fn writer(&self, seat: SeatNumber) -> Arc<Mutex<()>> {
        self.writers.lock().await.entry(seat).or_default().clone()
    }

    /// Shorten our lock to the post-success hold window.
    async fn hold(&self, seat: SeatNumber, claimant: MembershipId) {
        let now = self.clock.now();
        if let Some(lock) = self.locks.lock().await.get_mut(&seat) {
            if lock.holder == claimant {
                lock.expires_at = now.plus_std(self.config.hold_after_success);
            }
        }
    }

    /// Drop the lock on `seat` if `claimant` holds it.
    async fn unlock(&self, seat: SeatNumber, claimant: MembershipId) {
        let mut locks = self.locks.lock().await;
        if locks.get(&seat).is_some_and(|lock| lock.holder == claimant) {
            locks.remove(&seat);
        }
    }
}
