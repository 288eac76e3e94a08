//! Projected fee history for reporting.
//!
//! Replays the anchor grid period by period and matches recorded payments
//! against it. The projection is recomputed from scratch on every call and
//! never drives lifecycle transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::foundation::{Amount, Slot, ValidationError};

use super::cycle::{cycle_start, next_due_date, CYCLE_DAYS};
use super::PriceTable;

/// Maximum number of cycles a projection walks.
pub const MAX_PROJECTED_CYCLES: u32 = 12;

/// A recorded fee payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayment {
    pub paid_on: NaiveDate,
    pub amount: Amount,
}

/// Status of one projected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Paid,
    /// Unpaid, starts in the future.
    Upcoming,
    /// Unpaid, starts today.
    Due,
    /// Unpaid, start date has passed.
    Overdue,
}

/// One row of the projected history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period number.
    pub period: u32,
    pub amount: Amount,
    pub paid_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub status: PeriodStatus,
    pub days_valid_for: u32,
}

/// Projects up to [`MAX_PROJECTED_CYCLES`] periods from `anchor`.
///
/// Period `k` starts at `anchor + 30(k-1)` and falls due at `anchor + 30k`.
/// Payments are consumed in date order; a payment counts toward the first
/// open period whose due date is on or after the payment date. Projection
/// stops after the first unpaid period that has not started yet.
///
/// # Errors
///
/// Returns `ValidationError::UnknownSlot` when `slot` has no price.
pub fn project_history(
    anchor: NaiveDate,
    payments: &[FeePayment],
    prices: &PriceTable,
    slot: &Slot,
    today: NaiveDate,
) -> Result<Vec<PeriodRecord>, ValidationError> {
    let price = prices.price_for(slot)?;

    let mut ordered: Vec<&FeePayment> = payments.iter().collect();
    ordered.sort_by_key(|p| p.paid_on);
    let mut pending = ordered.into_iter().peekable();

    let mut records = Vec::new();
    for period in 1..=MAX_PROJECTED_CYCLES {
        let start = cycle_start(anchor, period);
        let due_date = cycle_start(anchor, period + 1);

        if let Some(payment) = pending.next_if(|p| p.paid_on <= due_date) {
            records.push(PeriodRecord {
                period,
                amount: payment.amount,
                paid_date: Some(payment.paid_on),
                due_date,
                status: PeriodStatus::Paid,
                days_valid_for: next_due_date(anchor, payment.paid_on).days_valid_for,
            });
            continue;
        }

        let status = match today.cmp(&start) {
            Ordering::Less => PeriodStatus::Upcoming,
            Ordering::Equal => PeriodStatus::Due,
            Ordering::Greater => PeriodStatus::Overdue,
        };
        records.push(PeriodRecord {
            period,
            amount: price,
            paid_date: None,
            due_date,
            status,
            days_valid_for: CYCLE_DAYS as u32,
        });

        if status == PeriodStatus::Upcoming {
            break;
        }
    }

    Ok(records)
}
