//! Notifier adapters.
//!
//! - `ResendEmailNotifier` - e-mail through the Resend API
//! - `ChatWebhookNotifier` - operator chat channel
//! - `FanoutNotifier` - broadcasts to any combination of the above

mod chat_webhook;
mod fanout;
mod resend;

pub use chat_webhook::{ChatWebhookConfig, ChatWebhookNotifier};
pub use fanout::FanoutNotifier;
pub use resend::{ResendConfig, ResendEmailNotifier};
