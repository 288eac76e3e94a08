//! Notification domain module.
//!
//! Categories, rendered messages, and the template language used for
//! member and admin notices. Delivery lives behind the `Notifier` port.

mod template;

pub use template::{render, TemplateContext, TemplateSet};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of notice being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Fee falls due in a few days.
    Reminder,
    /// Fee is due today (or was due very recently).
    Due,
    /// Membership terminated for non-payment.
    Overdue,
    /// Payment receipt.
    Payment,
    /// Operator-facing summary.
    Admin,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 5] = [
        NotificationCategory::Reminder,
        NotificationCategory::Due,
        NotificationCategory::Overdue,
        NotificationCategory::Payment,
        NotificationCategory::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Reminder => "reminder",
            NotificationCategory::Due => "due",
            NotificationCategory::Overdue => "overdue",
            NotificationCategory::Payment => "payment",
            NotificationCategory::Admin => "admin",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub category: NotificationCategory,

    /// Member address; `None` routes to the operator channel only.
    pub recipient: Option<String>,

    pub body: String,
}

impl Notification {
    pub fn new(category: NotificationCategory, recipient: Option<String>, body: impl Into<String>) -> Self {
        Self {
            category,
            recipient,
            body: body.into(),
        }
    }
}
