//! Study Hall - Seat membership and fee lifecycle engine
//!
//! Tracks monthly seat memberships at a study hall: 30-day fee cycles
//! anchored on the registration date, prorated late payments, reminders and
//! due notices, automatic seat reclamation after a grace period, and
//! conflict-free seat claims.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
