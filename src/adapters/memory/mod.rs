//! In-memory store adapters.
//!
//! Implementations of the storage ports for tests and single-process
//! deployments. Nothing here survives a restart.

mod membership_store;
mod seat_store;
mod settings_store;

pub use membership_store::InMemoryMembershipStore;
pub use seat_store::InMemorySeatStore;
pub use settings_store::InMemorySettingsStore;
