//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports. Member
//! facing commands live in `handlers`; the seat coordinator and the daily
//! reconciliation scheduler are long-lived services shared by them.

pub mod handlers;
pub mod notices;
pub mod reconciliation;
pub mod seating;

pub use handlers::{
    GetFeeHistoryHandler, GetFeeHistoryQuery, GetFeeHistoryResult, LeaveMembershipCommand,
    LeaveMembershipHandler, LeaveMembershipResult, ReactivateMembershipCommand,
    ReactivateMembershipHandler, ReactivateMembershipResult, RecordPaymentCommand,
    RecordPaymentHandler, RecordPaymentResult, RegisterMembershipCommand,
    RegisterMembershipHandler, RegisterMembershipResult, TransferSeatCommand,
    TransferSeatHandler, TransferSeatResult,
};
pub use reconciliation::{
    ReconciliationScheduler, SchedulerConfig, SchedulerError, SchedulerStatus, TickReport,
};
pub use seating::{LockStatus, ReservationOutcome, SeatCoordinator, SeatCoordinatorConfig, SeatError};
