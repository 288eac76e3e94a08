//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `billing` - Cycle calculator: due dates, fee status, proration, history
//! - `membership` - Membership aggregate and lifecycle
//! - `seat` - Seats and per-slot occupancy
//! - `notification` - Notice categories and message templates

pub mod billing;
pub mod foundation;
pub mod membership;
pub mod notification;
pub mod seat;
