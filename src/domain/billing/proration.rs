//! Partial-cycle fee proration.

use crate::domain::foundation::{Amount, ValidationError};

use super::cycle::CYCLE_DAYS;

/// Scales a full-cycle fee down to `days_valid_for` days.
///
/// Rounds half away from zero on the integer amount:
/// `round(full * days_valid_for / cycle_days)`.
///
/// # Errors
///
/// Returns `ValidationError` when `cycle_days` is zero.
pub fn prorated_amount(
    full: Amount,
    days_valid_for: u32,
    cycle_days: u32,
) -> Result<Amount, ValidationError> {
    if cycle_days == 0 {
        return Err(ValidationError::out_of_range("cycle_days", 1, u32::MAX, 0));
    }

    let numerator = i128::from(full.value()) * i128::from(days_valid_for);
    let denominator = i128::from(cycle_days);
    let rounded = (2 * numerator + denominator) / (2 * denominator);

    let value = i64::try_from(rounded)
        .map_err(|_| ValidationError::invalid_format("amount", "prorated amount overflows"))?;
    Amount::new(value)
}

/// Prorates over the standard cycle length.
pub fn prorated_for_cycle(full: Amount, days_valid_for: u32) -> Amount {
    // CYCLE_DAYS is non-zero, so the only failure left is overflow,
    // which cannot happen for days_valid_for <= CYCLE_DAYS.
    prorated_amount(full, days_valid_for.min(CYCLE_DAYS as u32), CYCLE_DAYS as u32)
        .unwrap_or(full)
}
