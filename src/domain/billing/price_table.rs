//! Slot-to-price lookup table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{Amount, Slot, ValidationError};

/// Full-cycle fee per time-slot.
///
/// Lookups are case-insensitive on the slot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct PriceTable {
    entries: BTreeMap<String, (Slot, Amount)>,
}

impl PriceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from raw `(slot name, amount)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank slot name or negative amount.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in entries {
            table = table.with_price(Slot::new(name)?, Amount::new(value)?);
        }
        Ok(table)
    }

    /// Adds or replaces the price for a slot.
    pub fn with_price(mut self, slot: Slot, amount: Amount) -> Self {
        self.entries.insert(slot.key(), (slot, amount));
        self
    }

    /// Full-cycle price for `slot`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownSlot` when the slot has no price.
    pub fn price_for(&self, slot: &Slot) -> Result<Amount, ValidationError> {
        self.entries
            .get(&slot.key())
            .map(|(_, amount)| *amount)
            .ok_or_else(|| ValidationError::unknown_slot(slot.as_str()))
    }

    /// Returns true if the slot has a configured price.
    pub fn contains(&self, slot: &Slot) -> bool {
        self.entries.contains_key(&slot.key())
    }

    /// All priced slots in key order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.entries.values().map(|(slot, _)| slot)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, i64>> for PriceTable {
    type Error = ValidationError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<PriceTable> for BTreeMap<String, i64> {
    fn from(table: PriceTable) -> Self {
        table
            .entries
            .into_values()
            .map(|(slot, amount)| (String::from(slot), amount.value()))
            .collect()
    }
}
