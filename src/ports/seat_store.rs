//! Seat store port.
//!
//! Seats are provisioned up front; the engine only reads and rewrites
//! them. Occupancy writes go through `SeatCoordinator` on the
//! registration path and through the scheduler on termination.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SeatNumber};
use crate::domain::seat::Seat;

/// Store port for seat records.
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Find a seat by number.
    ///
    /// Returns `None` for a number outside the provisioned pool.
    async fn get(&self, number: SeatNumber) -> Result<Option<Seat>, DomainError>;

    /// Replace a seat record.
    ///
    /// # Errors
    ///
    /// - `SeatNotFound` if the seat was never provisioned
    /// - `StoreUnavailable` on persistence failure
    async fn update(&self, seat: &Seat) -> Result<(), DomainError>;

    /// Every provisioned seat, ordered by number.
    async fn list_all(&self) -> Result<Vec<Seat>, DomainError>;
}
