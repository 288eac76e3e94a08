//! Billing cycle arithmetic.
//!
//! A cycle is a fixed run of [`CYCLE_DAYS`] calendar days anchored to the
//! membership's registration date. Payments made off the anchor grid buy a
//! partial cycle that snaps the next due date back onto the grid, so
//! renewal dates never drift even when members pay late or early.
//!
//! Everything here is pure: dates in, values out.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::FeeStatus;

/// Length of one billing cycle in days.
pub const CYCLE_DAYS: i64 = 30;

/// Whether a payment bought a whole cycle or the remainder of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Full,
    Partial,
}

/// Outcome of applying a payment to the anchor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDate {
    /// Date the next payment falls due.
    pub due_date: NaiveDate,

    /// Days the payment covers, `1..=CYCLE_DAYS`.
    pub days_valid_for: u32,

    pub cycle_kind: CycleKind,
}

/// Computes the due date that a payment on `payment` buys.
///
/// A payment on a cycle boundary buys a full cycle. Otherwise it covers
/// only the days remaining until the next boundary. The remainder is
/// taken Euclidean-style, so a payment dated before the anchor snaps
/// forward onto the same grid.
pub fn next_due_date(anchor: NaiveDate, payment: NaiveDate) -> DueDate {
    let days_since_anchor = (payment - anchor).num_days();
    let offset = days_since_anchor.rem_euclid(CYCLE_DAYS);

    if offset == 0 {
        return DueDate {
            due_date: payment + Duration::days(CYCLE_DAYS),
            days_valid_for: CYCLE_DAYS as u32,
            cycle_kind: CycleKind::Full,
        };
    }

    let remaining = CYCLE_DAYS - offset;
    DueDate {
        due_date: payment + Duration::days(remaining),
        days_valid_for: remaining as u32,
        cycle_kind: CycleKind::Partial,
    }
}

/// Fee status implied by `today` relative to `due`.
///
/// A membership is `Due` for exactly one calendar day.
pub fn status_for(due: NaiveDate, today: NaiveDate) -> FeeStatus {
    match today.cmp(&due) {
        Ordering::Less => FeeStatus::Paid,
        Ordering::Equal => FeeStatus::Due,
        Ordering::Greater => FeeStatus::Expired,
    }
}

/// Signed number of days from `today` until `due`; negative when overdue.
pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Start date of the `period`-th cycle (1-based) on the anchor grid.
pub fn cycle_start(anchor: NaiveDate, period: u32) -> NaiveDate {
    anchor + Duration::days(CYCLE_DAYS * (i64::from(period) - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        // 2000-01-01 plus up to ~55 years.
        (0i64..20_000).prop_map(|offset| date(2000, 1, 1) + Duration::days(offset))
    }

    #[test]
    fn payment_on_anchor_buys_full_cycle() {
        let result = next_due_date(date(2024, 1, 1), date(2024, 1, 1));
        assert_eq!(result.due_date, date(2024, 1, 31));
        assert_eq!(result.cycle_kind, CycleKind::Full);
        assert_eq!(result.days_valid_for, 30);
    }

    #[test]
    fn late_payment_snaps_back_to_anchor_grid() {
        let result = next_due_date(date(2024, 1, 1), date(2024, 1, 9));
        assert_eq!(result.due_date, date(2024, 1, 31));
        assert_eq!(result.cycle_kind, CycleKind::Partial);
        assert_eq!(result.days_valid_for, 22);
    }

    #[test]
    fn payment_on_later_boundary_is_full() {
        let result = next_due_date(date(2024, 1, 1), date(2024, 3, 1));
        // 60 days after the anchor, across a leap-year February.
        assert_eq!(result.cycle_kind, CycleKind::Full);
        assert_eq!(result.due_date, date(2024, 3, 31));
    }

    #[test]
    fn payment_before_anchor_snaps_forward() {
        let result = next_due_date(date(2024, 1, 10), date(2024, 1, 5));
        assert_eq!(result.due_date, date(2024, 1, 10));
        assert_eq!(result.days_valid_for, 5);
        assert_eq!(result.cycle_kind, CycleKind::Partial);
    }

    #[test]
    fn status_for_is_due_on_exact_day_only() {
        let due = date(2024, 2, 1);
        assert_eq!(status_for(due, date(2024, 1, 31)), FeeStatus::Paid);
        assert_eq!(status_for(due, due), FeeStatus::Due);
        assert_eq!(status_for(due, date(2024, 2, 2)), FeeStatus::Expired);
    }

    #[test]
    fn days_until_due_is_signed() {
        let due = date(2024, 2, 1);
        assert_eq!(days_until_due(due, date(2024, 1, 29)), 3);
        assert_eq!(days_until_due(due, due), 0);
        assert_eq!(days_until_due(due, date(2024, 2, 4)), -3);
    }

    #[test]
    fn cycle_start_walks_the_grid() {
        let anchor = date(2024, 1, 1);
        assert_eq!(cycle_start(anchor, 1), anchor);
        assert_eq!(cycle_start(anchor, 2), date(2024, 1, 31));
    }

    proptest! {
        #[test]
        fn boundary_payments_are_full(anchor in any_date(), cycles in 0i64..40) {
            let payment = anchor + Duration::days(cycles * CYCLE_DAYS);
            let result = next_due_date(anchor, payment);
            prop_assert_eq!(result.cycle_kind, CycleKind::Full);
            prop_assert_eq!(result.due_date, payment + Duration::days(CYCLE_DAYS));
        }

        #[test]
        fn off_boundary_payments_cover_the_remainder(anchor in any_date(), offset in 0i64..1200) {
            prop_assume!(offset % CYCLE_DAYS != 0);
            let payment = anchor + Duration::days(offset);
            let result = next_due_date(anchor, payment);
            let expected = CYCLE_DAYS - offset % CYCLE_DAYS;
            prop_assert_eq!(result.cycle_kind, CycleKind::Partial);
            prop_assert_eq!(i64::from(result.days_valid_for), expected);
            prop_assert_eq!(result.due_date, payment + Duration::days(expected));
        }

        #[test]
        fn paying_on_due_dates_returns_to_full_cycles(anchor in any_date(), offset in -100i64..1200) {
            let first = next_due_date(anchor, anchor + Duration::days(offset));
            let second = next_due_date(anchor, first.due_date);
            prop_assert_eq!(second.cycle_kind, CycleKind::Full);
            prop_assert_eq!((second.due_date - anchor).num_days().rem_euclid(CYCLE_DAYS), 0);
        }

        #[test]
        fn status_for_is_monotonic(due in any_date(), a in -60i64..60, b in -60i64..60) {
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            let s1 = status_for(due, due + Duration::days(earlier));
            let s2 = status_for(due, due + Duration::days(later));
            prop_assert!(s1.severity() <= s2.severity());
        }
    }
}
