//! Notice template overrides

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::notification::TemplateSet;

/// Per-category template overrides.
///
/// Unset categories keep the built-in wording. Templates use `{{key}}`
/// placeholders, e.g. `STUDY_HALL__TEMPLATES__REMINDER="Hi {{name}}, seat {{seatNumber}} is due {{dueDate}}"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    pub reminder: Option<String>,
    pub due: Option<String>,
    pub overdue: Option<String>,
    pub payment: Option<String>,
    pub admin: Option<String>,
}

impl TemplatesConfig {
    /// Reject overrides that would send an empty message.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, template) in self.entries() {
            if template.is_some_and(|t| t.trim().is_empty()) {
                return Err(ValidationError::BlankTemplate(name));
            }
        }
        Ok(())
    }

    /// Overrides layered over the default templates.
    pub fn template_set(&self) -> TemplateSet {
        let defaults = TemplateSet::default();
        let pick = |custom: &Option<String>, fallback: String| custom.clone().unwrap_or(fallback);
        TemplateSet {
            reminder: pick(&self.reminder, defaults.reminder),
            due: pick(&self.due, defaults.due),
            overdue: pick(&self.overdue, defaults.overdue),
            payment: pick(&self.payment, defaults.payment),
            admin: pick(&self.admin, defaults.admin),
        }
    }

    fn entries(&self) -> [(&'static str, Option<&String>); 5] {
        [
            ("reminder", self.reminder.as_ref()),
            ("due", self.due.as_ref()),
            ("overdue", self.overdue.as_ref()),
            ("payment", self.payment.as_ref()),
            ("admin", self.admin.as_ref()),
        ]
    }
}
