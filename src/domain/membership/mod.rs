//! Membership domain module.
//!
//! Handles the seat membership lifecycle: registration, payments, fee
//! status tracking, leaving, and reactivation.
//!
//! # Module Structure
//!
//! - `aggregate` - Membership aggregate entity
//! - `status` - MembershipState state machine
//! - `errors` - MembershipError

mod aggregate;
mod errors;
mod status;

pub use aggregate::{Membership, NoticeLog};
pub use errors::MembershipError;
pub use status::MembershipState;
