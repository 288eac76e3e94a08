//! Hall settings port.
//!
//! Global settings the scheduler reloads on every tick, so operators can
//! change prices and message wording without restarting the process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::PriceTable;
use crate::domain::foundation::DomainError;
use crate::domain::notification::TemplateSet;

/// Global hall settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallSettings {
    pub price_table: PriceTable,
    #[serde(default)]
    pub templates: TemplateSet,
}

/// Port for loading hall settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the current settings.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` when the settings cannot be read
    async fn load(&self) -> Result<HallSettings, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SettingsStore) {}
    }

    #[test]
    fn settings_deserialize_with_default_templates() {
        let settings: HallSettings =
            serde_json::from_str(r#"{"price_table": {"Morning": 900}}"#).unwrap();
        assert!(!settings.price_table.is_empty());
        assert_eq!(settings.templates, TemplateSet::default());
    }
}
