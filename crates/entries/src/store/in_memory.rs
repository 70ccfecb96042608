use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::r#trait::{DocumentStore, StoreError};
use crate::document::{DocumentPath, UserDocument};

/// In-memory document store.
///
/// Intended for tests/dev. Documents are kept as JSON so every write goes
/// through the same serialization as a real backend.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, JsonValue>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents at `path`, bypassing availability checks.
    pub fn document(&self, path: &DocumentPath) -> Option<UserDocument> {
        let documents = self.documents.read().ok()?;
        let raw = documents.get(&path.to_string())?;
        serde_json::from_value(raw.clone()).ok()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn replace_document(
        &self,
        path: &DocumentPath,
        document: &UserDocument,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;

        let raw = serde_json::to_value(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        documents.insert(path.to_string(), raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_document(&self, path: &DocumentPath) -> Result<Option<UserDocument>, StoreError> {
        self.ensure_available()?;

        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        documents
            .get(&path.to_string())
            .map(|raw| {
                serde_json::from_value(raw.clone())
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, Category, FinancialEntry};
    use chrono::Utc;
    use incometrack_core::UserId;

    fn path(user: &str) -> DocumentPath {
        let user: UserId = user.parse().unwrap();
        DocumentPath::for_user(&user)
    }

    #[tokio::test]
    async fn replace_overwrites_whole_document() {
        let store = InMemoryDocumentStore::new();
        let first = FinancialEntry::record(Amount::new("1"), Category::Taxable, Utc::now());
        let second = FinancialEntry::record(Amount::new("2"), Category::Taxable, Utc::now());

        store
            .replace_document(&path("u1"), &UserDocument::new(vec![first.clone(), second]))
            .await
            .unwrap();
        store
            .replace_document(&path("u1"), &UserDocument::new(vec![first.clone()]))
            .await
            .unwrap();

        let doc = store.fetch_document(&path("u1")).await.unwrap().unwrap();
        assert_eq!(doc.incomes, vec![first]);
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn documents_are_isolated_per_user() {
        let store = InMemoryDocumentStore::new();
        store
            .replace_document(&path("u1"), &UserDocument::default())
            .await
            .unwrap();

        assert!(store.fetch_document(&path("u2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn outage_fails_reads_and_writes() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);

        let err = store
            .replace_document(&path("u1"), &UserDocument::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.fetch_document(&path("u1")).await.is_err());
        assert_eq!(store.writes(), 0);
    }
}
