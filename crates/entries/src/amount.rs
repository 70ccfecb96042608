//! Entry amount as entered by the user.

use core::str::FromStr;

use incometrack_core::ValueObject;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amount text exactly as the user typed it.
///
/// No format validation happens at submission time, so an amount may be empty
/// or non-numeric. Use [`Amount::value`] to get a number out of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

impl ValueObject for Amount {}

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parsed decimal value, or `None` if the text is not a number.
    pub fn value(&self) -> Option<Decimal> {
        Decimal::from_str(self.0.trim()).ok()
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
