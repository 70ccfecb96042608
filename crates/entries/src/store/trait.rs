use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::{DocumentPath, UserDocument};

/// Document store operation error.
///
/// These are transport/storage failures. Callers treat them as recoverable and
/// keep their local state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store rejected the request: {0}")]
    Rejected(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),
}

/// Whole-document store keyed by user.
///
/// Writes are last-writer-wins overwrites; there is no field-level update and
/// no version check.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Overwrite the document at `path` with `document`.
    async fn replace_document(
        &self,
        path: &DocumentPath,
        document: &UserDocument,
    ) -> Result<(), StoreError>;

    /// Read the document at `path`; `None` if it was never written.
    async fn fetch_document(&self, path: &DocumentPath) -> Result<Option<UserDocument>, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn replace_document(
        &self,
        path: &DocumentPath,
        document: &UserDocument,
    ) -> Result<(), StoreError> {
        (**self).replace_document(path, document).await
    }

    async fn fetch_document(&self, path: &DocumentPath) -> Result<Option<UserDocument>, StoreError> {
        (**self).fetch_document(path).await
    }
}
