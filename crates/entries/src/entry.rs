//! Financial entries and the ordered collection that holds them.

use chrono::{DateTime, Utc};
use incometrack_core::{Entity, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::category::Category;

/// Display format for `recorded_at` (e.g. `18.10.2026`).
pub const RECORDED_AT_FORMAT: &str = "%d.%m.%Y";

/// One recorded income.
///
/// Field names on the wire match the stored user document
/// (`amount`, `type`, `date`, `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialEntry {
    pub amount: Amount,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "date")]
    pub recorded_at: String,
    pub id: EntryId,
}

impl FinancialEntry {
    /// New entry stamped at `now` with a fresh id.
    pub fn record(amount: Amount, category: Category, now: DateTime<Utc>) -> Self {
        Self {
            amount,
            category,
            recorded_at: format_recorded_at(now),
            id: EntryId::new(),
        }
    }
}

impl Entity for FinancialEntry {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub fn format_recorded_at(at: DateTime<Utc>) -> String {
    at.format(RECORDED_AT_FORMAT).to_string()
}

/// Insertion-ordered entries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCollection {
    entries: Vec<FinancialEntry>,
}

impl EntryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the end; existing order is untouched.
    pub fn push(&mut self, entry: FinancialEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinancialEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[FinancialEntry] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<FinancialEntry> {
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all amounts that parse as numbers. Others are skipped.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .filter_map(|e| e.amount.value())
            .sum()
    }

    /// Sum of parseable amounts in one category.
    pub fn total_for(&self, category: Category) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .filter_map(|e| e.amount.value())
            .sum()
    }
}

impl From<Vec<FinancialEntry>> for EntryCollection {
    fn from(entries: Vec<FinancialEntry>) -> Self {
        Self { entries }
    }
}
