//! Entry submission and synchronization errors.

use thiserror::Error;

use crate::store::StoreError;

/// Why an entry was not accepted. No local state changes when this is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    /// Field-level validation failure; the form shows it next to the dropdown.
    #[error("Select the type of income")]
    MissingCategory,

    #[error("no active session")]
    NoActiveSession,

    /// Submissions spawn their remote write and need a tokio runtime to do so.
    #[error("no async runtime available to persist the entry")]
    NoRuntime,
}

/// Failure to mirror local entries to the remote document.
///
/// Local state is never rolled back because of one of these.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no active session")]
    NoActiveSession,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("write task failed: {0}")]
    Task(String),
}
