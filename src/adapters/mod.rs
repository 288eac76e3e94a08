//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `memory` - In-memory membership, seat, and settings stores
//! - `notify` - E-mail and chat notifiers
//! - `clock` - System and manual clocks

pub mod clock;
pub mod memory;
pub mod notify;

pub use clock::{ManualClock, SystemClock};
pub use memory::{InMemoryMembershipStore, InMemorySeatStore, InMemorySettingsStore};
pub use notify::{
    ChatWebhookConfig, ChatWebhookNotifier, FanoutNotifier, ResendConfig, ResendEmailNotifier,
};
