//! Membership aggregate entity.
//!
//! A Membership is one paying occupant holding a seat for a daily slot.
//!
//! # Design Decisions
//!
//! - **Anchor grid**: due dates always sit on `registration_date + k·30`
//! - **Tracked status**: `fee_status` is stored and advanced explicitly,
//!   never recomputed from the clock on read
//! - **Notice log**: reminders record the due date they were sent for, so a
//!   repeated scheduler tick cannot notify twice for the same cycle

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::billing::{
    days_until_due, next_due_date, status_for, DueDate, FeePayment, FeeStatus,
};
use crate::domain::foundation::{
    Amount, DomainError, ErrorCode, MembershipId, SeatNumber, Slot, StateMachine, Timestamp,
    ValidationError,
};

use super::MembershipState;

/// Which notices have already gone out for the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeLog {
    /// Due date the advance reminder was sent for.
    pub reminder_sent_for: Option<NaiveDate>,

    /// Due date the due-today notice was sent for.
    pub due_notice_sent_for: Option<NaiveDate>,
}

impl NoticeLog {
    pub fn reminder_sent(&self, due: NaiveDate) -> bool {
        self.reminder_sent_for == Some(due)
    }

    pub fn due_notice_sent(&self, due: NaiveDate) -> bool {
        self.due_notice_sent_for == Some(due)
    }

    fn clear(&mut self) {
        *self = NoticeLog::default();
    }
}

/// Membership aggregate.
///
/// # Invariants
///
/// - `next_due_date == registration_date` until the first payment, then
///   `registration_date + k·30` for some `k >= 1`
/// - `payments` only holds payments made since the current anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,

    /// Display name used in notices.
    pub name: String,

    /// E-mail address notices are delivered to, if known.
    pub contact: Option<String>,

    pub seat_number: SeatNumber,
    pub slot: Slot,

    /// Cycle anchor. Reset only on reactivation.
    pub registration_date: NaiveDate,

    pub fee_status: FeeStatus,
    pub next_due_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,

    /// Payment ledger since the current anchor.
    pub payments: Vec<FeePayment>,

    pub notices: NoticeLog,

    pub state: MembershipState,
    pub left_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Membership {
    /// Register a new membership.
    ///
    /// The first cycle is due immediately: `fee_status` starts as `Due` and
    /// `next_due_date` equals the registration date.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank.
    pub fn register(
        id: MembershipId,
        name: impl Into<String>,
        contact: Option<String>,
        seat_number: SeatNumber,
        slot: Slot,
        registration_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            name,
            contact: contact.filter(|c| !c.trim().is_empty()),
            seat_number,
            slot,
            registration_date,
            fee_status: FeeStatus::Due,
            next_due_date: registration_date,
            last_payment_date: None,
            payments: Vec::new(),
            notices: NoticeLog::default(),
            state: MembershipState::Active,
            left_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.state == MembershipState::Active
    }

    /// Signed days from `today` to the tracked due date.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        days_until_due(self.next_due_date, today)
    }

    /// Apply a fee payment made on `paid_on`.
    ///
    /// Advances the due date on the anchor grid, marks the membership paid,
    /// and clears the notice log for the new cycle.
    ///
    /// # Errors
    ///
    /// Returns error if the membership has left.
    pub fn record_payment(
        &mut self,
        paid_on: NaiveDate,
        amount: Amount,
    ) -> Result<DueDate, DomainError> {
        self.ensure_active("record payment")?;

        let due = next_due_date(self.registration_date, paid_on);
        self.transition_fee(FeeStatus::Paid)?;
        self.next_due_date = due.due_date;
        self.last_payment_date = Some(paid_on);
        self.payments.push(FeePayment { paid_on, amount });
        self.notices.clear();
        self.touch();
        Ok(due)
    }

    /// Advance the tracked fee status toward what the calendar implies.
    ///
    /// Only moves forward (paid → due → expired); returns the new status
    /// when it changed. Left memberships are never touched.
    pub fn sync_fee_status(&mut self, today: NaiveDate) -> Option<FeeStatus> {
        if !self.is_active() {
            return None;
        }

        let implied = status_for(self.next_due_date, today);
        if implied.severity() <= self.fee_status.severity() {
            return None;
        }

        self.fee_status = self.fee_status.transition_to(implied).ok()?;
        self.touch();
        Some(implied)
    }

    /// Mark fees expired. Re-expiring is a no-op.
    ///
    /// # Errors
    ///
    /// Returns error if the current status cannot expire.
    pub fn expire(&mut self) -> Result<(), DomainError> {
        if self.fee_status == FeeStatus::Expired {
            return Ok(());
        }
        self.transition_fee(FeeStatus::Expired)?;
        self.touch();
        Ok(())
    }

    /// Archive the membership as left.
    ///
    /// Returns `false` when it had already left, so terminating twice
    /// succeeds silently.
    pub fn leave(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = MembershipState::Left;
        self.left_at = Some(Timestamp::now());
        self.touch();
        true
    }

    /// Bring a left membership back with a fresh anchor.
    ///
    /// # Errors
    ///
    /// Returns error if the membership is still active.
    pub fn reactivate(
        &mut self,
        seat_number: SeatNumber,
        slot: Slot,
        registration_date: NaiveDate,
    ) -> Result<(), DomainError> {
        self.state = self.state.transition_to(MembershipState::Active).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Membership {} is already active", self.id),
            )
        })?;
        self.seat_number = seat_number;
        self.slot = slot;
        self.registration_date = registration_date;
        self.fee_status = FeeStatus::Due;
        self.next_due_date = registration_date;
        self.last_payment_date = None;
        self.payments.clear();
        self.notices.clear();
        self.left_at = None;
        self.touch();
        Ok(())
    }

    /// Point the membership at a different seat/slot.
    ///
    /// # Errors
    ///
    /// Returns error if the membership has left.
    pub fn move_to(&mut self, seat_number: SeatNumber, slot: Slot) -> Result<(), DomainError> {
        self.ensure_active("transfer seat")?;
        self.seat_number = seat_number;
        self.slot = slot;
        self.touch();
        Ok(())
    }

    pub fn mark_reminder_sent(&mut self) {
        self.notices.reminder_sent_for = Some(self.next_due_date);
        self.touch();
    }

    pub fn mark_due_notice_sent(&mut self) {
        self.notices.due_notice_sent_for = Some(self.next_due_date);
        self.touch();
    }

    fn ensure_active(&self, attempted: &str) -> Result<(), DomainError> {
        if self.is_active() {
            return Ok(());
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Cannot {} for membership {} that has left", attempted, self.id),
        ))
    }

    fn transition_fee(&mut self, target: FeeStatus) -> Result<(), DomainError> {
        self.fee_status = self.fee_status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition fee status from {:?} to {:?}",
                    self.fee_status, target
                ),
            )
        })?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
