//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `MembershipStore` - Membership persistence
//! - `SeatStore` - Seat records and occupancy
//! - `SettingsStore` - Price table and message templates
//!
//! ## Side-effect Ports
//!
//! - `Notifier` - Delivery of rendered notices
//! - `Clock` - Current time

mod clock;
mod membership_store;
mod notifier;
mod seat_store;
mod settings_store;

pub use clock::Clock;
pub use membership_store::MembershipStore;
pub use notifier::Notifier;
pub use seat_store::SeatStore;
pub use settings_store::{HallSettings, SettingsStore};
