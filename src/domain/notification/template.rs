//! Message templates with `{{key}}` placeholders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::NotificationCategory;

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, replacing any previous one for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Substitutes `{{key}}` placeholders from `context`.
///
/// Whitespace inside the braces is ignored. Placeholders with no value in
/// the context, and unterminated `{{`, are left verbatim.
pub fn render(template: &str, context: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = after_open[..close].trim();
        match context.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Message templates per notification category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSet {
    pub reminder: String,
    pub due: String,
    pub overdue: String,
    pub payment: String,
    pub admin: String,
}

impl TemplateSet {
    /// Template for `category`.
    pub fn for_category(&self, category: NotificationCategory) -> &str {
        match category {
            NotificationCategory::Reminder => &self.reminder,
            NotificationCategory::Due => &self.due,
            NotificationCategory::Overdue => &self.overdue,
            NotificationCategory::Payment => &self.payment,
            NotificationCategory::Admin => &self.admin,
        }
    }

    /// Renders the template for `category`.
    pub fn render(&self, category: NotificationCategory, context: &TemplateContext) -> String {
        render(self.for_category(category), context)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            reminder: "Hi {{name}}, your fee for seat {{seatNumber}} ({{slot}}) is due on \
                       {{dueDate}}, {{daysLeft}} days from now. Amount: {{amount}}."
                .to_string(),
            due: "Hi {{name}}, your fee for seat {{seatNumber}} ({{slot}}) was due on \
                  {{dueDate}}. Amount: {{amount}}. Please renew to keep your seat."
                .to_string(),
            overdue: "Hi {{name}}, your fee due on {{dueDate}} was not paid. Seat \
                      {{seatNumber}} ({{slot}}) has been released."
                .to_string(),
            payment: "Hi {{name}}, we received {{amount}} for seat {{seatNumber}} \
                      ({{slot}}). Next due date: {{dueDate}}."
                .to_string(),
            admin: "{{summary}}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_known_keys() {
        let ctx = TemplateContext::new().with("name", "Asha").with("seatNumber", 5);
        assert_eq!(render("{{name}} sits at {{seatNumber}}", &ctx), "Asha sits at 5");
    }

    #[test]
    fn render_leaves_missing_keys_verbatim() {
        let ctx = TemplateContext::new().with("name", "Asha");
        assert_eq!(render("{{name}} owes {{amount}}", &ctx), "Asha owes {{amount}}");
    }

    #[test]
    fn render_ignores_whitespace_inside_braces() {
        let ctx = TemplateContext::new().with("slot", "Morning");
        assert_eq!(render("slot: {{ slot }}", &ctx), "slot: Morning");
    }

    #[test]
    fn render_keeps_unterminated_placeholder() {
        let ctx = TemplateContext::new().with("name", "Asha");
        assert_eq!(render("Hi {{name}} {{oops", &ctx), "Hi Asha {{oops");
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let ctx = TemplateContext::new()
            .with("name", "{{slot}}")
            .with("slot", "Morning");
        assert_eq!(render("{{name}}", &ctx), "{{slot}}");
    }

    #[test]
    fn default_templates_cover_every_category() {
        let templates = TemplateSet::default();
        for category in NotificationCategory::ALL {
            assert!(!templates.for_category(category).is_empty());
        }
    }

    #[test]
    fn partial_template_config_falls_back_to_defaults() {
        let templates: TemplateSet = serde_json::from_str(r#"{"reminder": "pay up"}"#).unwrap();
        assert_eq!(templates.reminder, "pay up");
        assert_eq!(templates.due, TemplateSet::default().due);
    }
}
