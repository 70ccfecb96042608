//! The per-user remote document.

use incometrack_core::UserId;
use serde::{Deserialize, Serialize};

use crate::entry::FinancialEntry;

/// Location of a user's document in the remote store: `users/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    user_id: UserId,
}

impl DocumentPath {
    pub const COLLECTION: &'static str = "users";

    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            user_id: user_id.clone(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl core::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", Self::COLLECTION, self.user_id)
    }
}

/// Whole contents of a user's document. Always written in full.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub incomes: Vec<FinancialEntry>,
}

impl UserDocument {
    pub fn new(incomes: Vec<FinancialEntry>) -> Self {
        Self { incomes }
    }
}
