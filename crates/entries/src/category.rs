use core::str::FromStr;

use incometrack_core::DomainError;
use serde::{Deserialize, Serialize};

/// Tax treatment of an income entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Taxable")]
    Taxable,
    #[serde(rename = "Non-taxable")]
    NonTaxable,
}

impl Category {
    /// Options offered by the category dropdown, in display order.
    pub const ALL: [Category; 2] = [Category::Taxable, Category::NonTaxable];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Taxable => "Taxable",
            Category::NonTaxable => "Non-taxable",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown category '{s}'")))
    }
}
