//! Slot pricing configuration

use serde::Deserialize;
use std::collections::BTreeMap;

use super::error::ValidationError;
use crate::domain::billing::PriceTable;

/// Full-cycle price per slot name
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_slots")]
    pub slots: BTreeMap<String, i64>,
}

impl PricingConfig {
    /// Validate pricing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.slots.is_empty() {
            return Err(ValidationError::NoPricedSlots);
        }
        for (name, price) in &self.slots {
            if name.trim().is_empty() || *price < 0 {
                return Err(ValidationError::InvalidPrice(name.clone()));
            }
        }
        Ok(())
    }

    /// Build the price table the calculator reads.
    pub fn price_table(&self) -> Result<PriceTable, ValidationError> {
        PriceTable::from_entries(self.slots.iter().map(|(name, price)| (name.as_str(), *price)))
            .map_err(|err| ValidationError::InvalidPrice(err.to_string()))
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
        }
    }
}

fn default_slots() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("Morning".to_string(), 900),
        ("Evening".to_string(), 900),
        ("Full Day".to_string(), 1500),
    ])
}
