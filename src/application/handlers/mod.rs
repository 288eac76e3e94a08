//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod membership;

pub use membership::{
    // Commands
    LeaveMembershipCommand, LeaveMembershipHandler, LeaveMembershipResult,
    ReactivateMembershipCommand, ReactivateMembershipHandler, ReactivateMembershipResult,
    RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult,
    RegisterMembershipCommand, RegisterMembershipHandler, RegisterMembershipResult,
    TransferSeatCommand, TransferSeatHandler, TransferSeatResult,
    // Queries
    GetFeeHistoryHandler, GetFeeHistoryQuery, GetFeeHistoryResult,
};
