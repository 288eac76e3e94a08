//! Seat coordination errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SeatNumber};

/// Infrastructure-level failures of a seat operation.
///
/// Conflicts are not errors; they come back as
/// [`ReservationOutcome::Conflict`](super::ReservationOutcome::Conflict).
#[derive(Debug, Clone, Error)]
pub enum SeatError {
    #[error("Seat {0} does not exist")]
    NotFound(SeatNumber),

    #[error("Seat store failure: {0}")]
    Store(#[from] DomainError),
}

impl SeatError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SeatError::NotFound(_) => ErrorCode::SeatNotFound,
            SeatError::Store(err) => err.code,
        }
    }
}
