//! Billing domain module - the cycle calculator.
//!
//! Pure fee-cycle computations: due dates on the registration anchor grid,
//! status implied by the calendar, proration of partial cycles, and
//! projected fee history.
//!
//! # Module Structure
//!
//! - `cycle` - Due date, status, and day-offset arithmetic
//! - `fee_status` - FeeStatus state machine
//! - `proration` - Partial-cycle amounts
//! - `price_table` - Slot-to-price lookup
//! - `history` - Projected period records

mod cycle;
mod fee_status;
mod history;
mod price_table;
mod proration;

pub use cycle::{cycle_start, days_until_due, next_due_date, status_for, CycleKind, DueDate, CYCLE_DAYS};
pub use fee_status::FeeStatus;
pub use history::{project_history, FeePayment, PeriodRecord, PeriodStatus, MAX_PROJECTED_CYCLES};
pub use price_table::PriceTable;
pub use proration::{prorated_amount, prorated_for_cycle};
