//! RecordPaymentHandler - Command handler for fee payments.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::notices::member_notice;
use crate::application::seating::SeatCoordinator;
use crate::domain::billing::{next_due_date, prorated_for_cycle, DueDate, FeeStatus};
use crate::domain::foundation::{Amount, MembershipId};
use crate::domain::membership::{Membership, MembershipError};
use crate::domain::notification::NotificationCategory;
use crate::ports::{Clock, HallSettings, MembershipStore, Notifier, SettingsStore};

/// Command to record a fee payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub membership_id: MembershipId,
    /// Defaults to the hall's local date.
    pub paid_on: Option<NaiveDate>,
    /// Defaults to the slot price prorated to the days the payment buys.
    pub amount: Option<i64>,
}

/// Result of a recorded payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentResult {
    pub membership: Membership,
    pub due: DueDate,
    pub amount: Amount,
    pub receipt_sent: bool,
}

/// Handler for recording payments.
///
/// The receipt is best effort: a delivery failure is logged and the
/// payment still stands.
pub struct RecordPaymentHandler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    seating: Arc<SeatCoordinator>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    utc_offset_minutes: i32,
}

impl RecordPaymentHandler {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        settings: Arc<dyn SettingsStore>,
        seating: Arc<SeatCoordinator>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            memberships,
            settings,
            seating,
            notifier,
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
        cmd: RecordPaymentCommand,
    ) -> Result<RecordPaymentResult, MembershipError> {
        // 1. Load membership and prices
        let mut membership = self
            .memberships
            .get(&cmd.membership_id)
            .await?
            .ok_or(MembershipError::not_found(cmd.membership_id))?;
        let settings = self.settings.load().await?;
        let paid_on = cmd.paid_on
            .unwrap_or_else(|| self.clock.now().date_at_offset(self.utc_offset_minutes));

        // 2. Work out the amount
        let amount = match cmd.amount {
            Some(value) => Amount::new(value)?,
            None => {
                let full = settings.price_table.price_for(&membership.slot)?;
                let cycle = next_due_date(membership.registration_date, paid_on);
                prorated_for_cycle(full, cycle.days_valid_for)
            }
        };

        // 3. Apply and persist
        let due = membership.record_payment(paid_on, amount)?;
        self.memberships.update(&membership).await?;

        if let Err(err) = self
            .seating
            .mirror_status(membership.seat_number, membership.id, FeeStatus::Paid)
            .await
        {
            warn!(
                membership_id = %membership.id,
                seat = %membership.seat_number,
                error = %err,
                "Failed to mirror paid status onto seat"
            );
        }

        info!(
            membership_id = %membership.id,
            amount = amount.value(),
            next_due_date = %due.due_date,
            cycle_kind = ?due.cycle_kind,
            "Payment recorded"
        );

        // 4. Receipt
        let receipt_sent = self.send_receipt(&membership, amount, paid_on, &settings).await;

        Ok(RecordPaymentResult {
            membership,
            due,
            amount,
            receipt_sent,
        })
    }

    async fn send_receipt(
        &self,
        membership: &Membership,
        amount: Amount,
        today: NaiveDate,
        settings: &HallSettings,
    ) -> bool {
        if !self.notifier.is_configured() {
            return false;
        }

        let notice = member_notice(
            &settings.templates,
            NotificationCategory::Payment,
            membership,
            Some(amount),
            today,
        );
        match self.notifier.send(&notice).await {
            Ok(()) => true,
            Err(err) => {
                warn!(membership_id = %membership.id, error = %err, "Failed to send payment receipt");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::test_support::{
        date, BrokenNotifier, Fixture, MockNotifier,
    };
    use crate::domain::billing::CycleKind;
    use crate::domain::foundation::{ErrorCode, SeatNumber, Slot};
    use crate::domain::seat::SeatStatus;
    use crate::ports::SeatStore;

    async fn registered(f: &Fixture, anchor: NaiveDate) -> Membership {
        let m = Membership::register(
            MembershipId::new(),
            "Asha",
            Some("asha@example.com".to_string()),
            SeatNumber::new(5).unwrap(),
            Slot::new("Morning").unwrap(),
            anchor,
        )
        .unwrap();
        f.seating.reserve(m.seat_number, m.id, &m.slot).await.unwrap();
        f.memberships.save(&m).await.unwrap();
        m
    }

    fn handler(f: &Fixture, notifier: Arc<dyn Notifier>) -> RecordPaymentHandler {
        RecordPaymentHandler::new(
            Arc::new(f.memberships.clone()),
            Arc::new(f.settings.clone()),
            f.seating.clone(),
            notifier,
            f.clock.clone(),
        )
    }

    fn pay(id: MembershipId, on: NaiveDate, amount: Option<i64>) -> RecordPaymentCommand {
        RecordPaymentCommand {
            membership_id: id,
            paid_on: Some(on),
            amount,
        }
    }

    #[tokio::test]
    async fn on_time_payment_buys_a_full_cycle_at_full_price() {
        let f = Fixture::new(date(2024, 1, 1));
        let notifier = MockNotifier::new();
        let m = registered(&f, date(2024, 1, 1)).await;

        let result = handler(&f, notifier.clone())
            .handle(pay(m.id, date(2024, 1, 1), None))
            .await
            .unwrap();

        assert_eq!(result.due.cycle_kind, CycleKind::Full);
        assert_eq!(result.due.due_date, date(2024, 1, 31));
        assert_eq!(result.amount.value(), 900);
        assert_eq!(result.membership.fee_status, FeeStatus::Paid);

        let seat = f.seats.get(m.seat_number).await.unwrap().unwrap();
        assert_eq!(seat.status_for(&m.slot), SeatStatus::Paid);

        assert!(result.receipt_sent);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].category, NotificationCategory::Payment);
        assert!(sent[0].body.contains("2024-01-31"));
    }

    #[tokio::test]
    async fn default_payment_date_follows_hall_offset() {
        // 10:00 UTC on Jan 31 is still Jan 30 at UTC-11.
        let f = Fixture::new(date(2024, 1, 31));
        let m = registered(&f, date(2024, 1, 1)).await;

        let result = handler(&f, MockNotifier::new())
            .with_utc_offset_minutes(-660)
            .handle(RecordPaymentCommand {
                membership_id: m.id,
                paid_on: None,
                amount: None,
            })
            .await
            .unwrap();

        assert_eq!(result.membership.last_payment_date, Some(date(2024, 1, 30)));
        assert_eq!(result.due.due_date, date(2024, 1, 31));
        assert_eq!(result.due.cycle_kind, CycleKind::Partial);
    }

    #[tokio::test]
    async fn late_payment_is_prorated_to_the_partial_cycle() {
        let f = Fixture::new(date(2024, 1, 9));
        let m = registered(&f, date(2024, 1, 1)).await;

        let result = handler(&f, MockNotifier::new())
            .handle(pay(m.id, date(2024, 1, 9), None))
            .await
            .unwrap();

        assert_eq!(result.due.cycle_kind, CycleKind::Partial);
        assert_eq!(result.due.days_valid_for, 22);
        assert_eq!(result.due.due_date, date(2024, 1, 31));
        // 900 * 22 / 30 = 660
        assert_eq!(result.amount.value(), 660);
    }

    #[tokio::test]
    async fn explicit_amount_is_recorded_as_given() {
        let f = Fixture::new(date(2024, 1, 1));
        let m = registered(&f, date(2024, 1, 1)).await;

        let result = handler(&f, MockNotifier::new())
            .handle(pay(m.id, date(2024, 1, 1), Some(500)))
            .await
            .unwrap();

        assert_eq!(result.amount.value(), 500);
        assert_eq!(result.membership.payments.len(), 1);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let f = Fixture::new(date(2024, 1, 1));
        let m = registered(&f, date(2024, 1, 1)).await;

        let err = handler(&f, MockNotifier::new())
            .handle(pay(m.id, date(2024, 1, 1), Some(-5)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn paying_a_left_membership_is_invalid() {
        let f = Fixture::new(date(2024, 1, 1));
        let mut m = registered(&f, date(2024, 1, 1)).await;
        m.leave();
        f.memberships.update(&m).await.unwrap();

        let err = handler(&f, MockNotifier::new())
            .handle(pay(m.id, date(2024, 1, 1), None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn unknown_membership_is_not_found() {
        let f = Fixture::new(date(2024, 1, 1));
        let err = handler(&f, MockNotifier::new())
            .handle(pay(MembershipId::new(), date(2024, 1, 1), None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MembershipNotFound);
    }

    #[tokio::test]
    async fn receipt_failure_does_not_undo_payment() {
        let f = Fixture::new(date(2024, 1, 1));
        let m = registered(&f, date(2024, 1, 1)).await;

        let result = handler(&f, Arc::new(BrokenNotifier))
            .handle(pay(m.id, date(2024, 1, 1), None))
            .await
            .unwrap();

        assert!(!result.receipt_sent);
        let stored = f.memberships.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Paid);
    }
}
