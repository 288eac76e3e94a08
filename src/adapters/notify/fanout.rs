//! Fan-out notifier - delivers each notice on every configured channel.
//!
//! Delivery counts as successful when at least one channel accepted the
//! notice. Failures on individual channels are logged.
//!
//! # Example
//!
//! ```ignore
//! let notifier = FanoutNotifier::new()
//!     .with_channel("email", Arc::new(email))
//!     .with_channel("chat", Arc::new(chat));
//! ```

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::Notification;
use crate::ports::Notifier;

/// Notifier that broadcasts to a set of channels.
#[derive(Default, Clone)]
pub struct FanoutNotifier {
    channels: Vec<(&'static str, Arc<dyn Notifier>)>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, name: &'static str, notifier: Arc<dyn Notifier>) -> Self {
        self.channels.push((name, notifier));
        self
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|(name, _)| *name).collect()
    }
}

#[async_trait]
impl Notifier for FanoutNotifier {
    fn is_configured(&self) -> bool {
        self.channels.iter().any(|(_, n)| n.is_configured())
    }

    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let configured: Vec<_> = self
            .channels
            .iter()
            .filter(|(_, n)| n.is_configured())
            .collect();

        let results = join_all(
            configured
                .iter()
                .map(|(_, notifier)| notifier.send(notification)),
        )
        .await;

        let mut delivered = false;
        let mut failures = Vec::new();
        for ((name, _), result) in configured.iter().zip(results) {
            match result {
                Ok(()) => delivered = true,
                Err(err) => {
                    warn!(
                        channel = name,
                        category = %notification.category,
                        error = %err,
                        "Notification channel failed"
                    );
                    failures.push(format!("{}: {}", name, err.message));
                }
            }
        }

        if delivered || failures.is_empty() {
            return Ok(());
        }

        Err(DomainError::new(
            ErrorCode::NotificationFailed,
            format!("All channels failed ({})", failures.join("; ")),
        ))
    }
}
