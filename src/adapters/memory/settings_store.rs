//! In-memory hall settings.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{HallSettings, SettingsStore};

/// Settings held in memory and replaceable at runtime.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<HallSettings>>,
}

impl InMemorySettingsStore {
    pub fn new(settings: HallSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Swap in new settings; picked up by the next tick.
    pub async fn replace(&self, settings: HallSettings) {
        *self.settings.write().await = settings;
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<HallSettings, DomainError> {
        Ok(self.settings.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::PriceTable;

    #[tokio::test]
    async fn replace_is_visible_on_next_load() {
        let store = InMemorySettingsStore::default();
        assert!(store.load().await.unwrap().price_table.is_empty());

        store
            .replace(HallSettings {
                price_table: PriceTable::from_entries([("Morning", 900)]).unwrap(),
                ..Default::default()
            })
            .await;

        assert!(!store.load().await.unwrap().price_table.is_empty());
    }
}
