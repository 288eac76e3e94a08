//! Seat claim arbitration.

mod coordinator;
mod errors;

pub use coordinator::{LockStatus, ReservationOutcome, SeatCoordinator, SeatCoordinatorConfig};
pub use errors::SeatError;
