//! Seat domain module.
//!
//! Seats are a fixed pool provisioned at bootstrap. Each seat tracks who
//! holds it in which daily slot.

mod aggregate;

pub use aggregate::{Occupancy, Seat, SeatStatus};
