//! Membership-specific error types.
//!
//! # User-facing mapping
//!
//! | Error | Meaning for the caller |
//! |-------|------------------------|
//! | NotFound | 404 |
//! | SeatUnavailable | ask the user to pick another seat |
//! | SeatNotFound | 404 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500, retryable |

use thiserror::Error;

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, SeatNumber, Slot, ValidationError,
};

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("Membership not found: {0}")]
    NotFound(MembershipId),

    #[error("Seat {seat} ({slot}) is no longer available")]
    SeatUnavailable { seat: SeatNumber, slot: Slot },

    #[error("Seat {0} does not exist")]
    SeatNotFound(SeatNumber),

    #[error("Cannot {attempted} membership in {current} state")]
    InvalidState { current: String, attempted: String },

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl MembershipError {
    pub fn not_found(id: MembershipId) -> Self {
        MembershipError::NotFound(id)
    }

    pub fn seat_unavailable(seat: SeatNumber, slot: Slot) -> Self {
        MembershipError::SeatUnavailable { seat, slot }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound(_) => ErrorCode::MembershipNotFound,
            MembershipError::SeatUnavailable { .. } => ErrorCode::SeatUnavailable,
            MembershipError::SeatNotFound(_) => ErrorCode::SeatNotFound,
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Infrastructure(_) => ErrorCode::StoreUnavailable,
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MembershipError::Infrastructure(_))
    }
}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => MembershipError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => MembershipError::InvalidState {
                current: "current".to_string(),
                attempted: err.message,
            },
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
            ValidationError::UnknownSlot { .. } => "slot".to_string(),
        };
        MembershipError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
