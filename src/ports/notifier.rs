//! Notifier port - Interface for delivering member and admin notices.
//!
//! The engine renders messages itself and hands them over with a category.
//! How they travel (e-mail, chat, SMS) is the adapter's business.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;

/// Port for sending rendered notifications.
///
/// Implementations must bound their own network calls with timeouts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns true if at least one delivery channel is set up.
    ///
    /// The scheduler skips sending entirely when this is false but still
    /// performs every status and seat transition.
    fn is_configured(&self) -> bool;

    /// Deliver one notification.
    ///
    /// # Errors
    ///
    /// - `NotificationFailed` when delivery failed
    async fn send(&self, notification: &Notification) -> Result<(), DomainError>;
}
