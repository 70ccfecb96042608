//! Local entry state and its remote mirror.
//!
//! Submissions are optimistic: the entry is appended and published locally
//! first, then the complete collection is written over the user's remote
//! document in a spawned task. A failed write never rolls the local append back.
//!
//! Writes are ordered per document by a revision number taken under the local
//! lock. A write that finds a newer revision of its document already persisted is
//! skipped, so an older, shorter collection can never overwrite a newer one from
//! this process. Writes to different documents never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use incometrack_core::{IdentitySource, UserId};
use rust_decimal::Decimal;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::amount::Amount;
use crate::clock::{Clock, SystemClock};
use crate::document::{DocumentPath, UserDocument};
use crate::entry::{EntryCollection, FinancialEntry};
use crate::error::{EntryError, SyncError};
use crate::form::EntryForm;
use crate::store::DocumentStore;

/// Handle to a spawned remote write.
///
/// Await it with [`PendingWrite::wait`] or drop it. Dropping detaches the task:
/// the write still runs, nobody observes the outcome, and that is not an error.
#[derive(Debug)]
pub struct PendingWrite {
    handle: JoinHandle<Result<(), SyncError>>,
}

impl PendingWrite {
    pub async fn wait(self) -> Result<(), SyncError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(SyncError::Task(err.to_string())),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Outcome of an accepted submission.
#[derive(Debug)]
pub struct Submission {
    pub entry: FinancialEntry,
    pub write: PendingWrite,
}

#[derive(Debug, Default)]
struct LocalState {
    entries: EntryCollection,
    revision: u64,
}

/// Highest persisted revision per document.
type Persisted = Arc<tokio::sync::Mutex<u64>>;

#[derive(Debug, Default)]
struct WriteLane {
    documents: Mutex<HashMap<DocumentPath, Persisted>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    Replaced,
    Superseded,
}

impl WriteLane {
    fn persisted(&self, path: &DocumentPath) -> Persisted {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(documents.entry(path.clone()).or_default())
    }

    /// Write `document` unless a newer revision of `path` has already landed.
    ///
    /// Holds only this document's lane across the store call.
    async fn replace(
        &self,
        store: &dyn DocumentStore,
        path: &DocumentPath,
        revision: u64,
        document: &UserDocument,
    ) -> Result<WriteOutcome, SyncError> {
        let lane = self.persisted(path);
        let mut persisted = lane.lock().await;
        if *persisted >= revision {
            tracing::debug!(%path, revision, persisted = *persisted, "skipping superseded document write");
            return Ok(WriteOutcome::Superseded);
        }

        match store.replace_document(path, document).await {
            Ok(()) => {
                *persisted = revision;
                tracing::info!(%path, revision, entries = document.incomes.len(), "document replaced");
                Ok(WriteOutcome::Replaced)
            }
            Err(err) => {
                tracing::warn!(%path, revision, error = %err, "document write failed; keeping local entries");
                Err(SyncError::Store(err))
            }
        }
    }
}

/// Owns the active session's entries and mirrors them remotely.
pub struct EntrySynchronizer {
    identity: Arc<dyn IdentitySource>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<LocalState>,
    read_model: watch::Sender<Vec<FinancialEntry>>,
    lane: Arc<WriteLane>,
}

impl core::fmt::Debug for EntrySynchronizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntrySynchronizer")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl EntrySynchronizer {
    pub fn new(identity: Arc<dyn IdentitySource>, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_clock(identity, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        identity: Arc<dyn IdentitySource>,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (read_model, _) = watch::channel(Vec::new());
        Self {
            identity,
            store,
            clock,
            state: Mutex::new(LocalState::default()),
            read_model,
            lane: Arc::new(WriteLane::default()),
        }
    }

    /// Validate the form's draft, record it, and start the remote write.
    ///
    /// Rejections leave every piece of local state untouched except the form's
    /// validation flags. On acceptance the form is reset to empty fields.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_entry(&self, form: &mut EntryForm) -> Result<Submission, EntryError> {
        let Some(category) = form.draft().category else {
            form.flag_missing_category();
            tracing::debug!("entry rejected: no category selected");
            return Err(EntryError::MissingCategory);
        };
        let Some(user_id) = self.identity.active_user() else {
            tracing::warn!("entry rejected: no active session");
            return Err(EntryError::NoActiveSession);
        };
        let runtime = Handle::try_current().map_err(|_| EntryError::NoRuntime)?;

        let entry = FinancialEntry::record(
            Amount::new(form.draft().amount.clone()),
            category,
            self.clock.now(),
        );

        let (revision, document) = {
            let mut state = self.lock();
            state.entries.push(entry.clone());
            state.revision += 1;
            let snapshot = state.entries.to_vec();
            self.read_model.send_replace(snapshot.clone());
            (state.revision, UserDocument::new(snapshot))
        };
        form.reset();

        tracing::info!(
            user_id = %user_id,
            entry_id = %entry.id,
            entries = document.incomes.len(),
            "entry recorded"
        );

        let write = self.spawn_replace(&runtime, user_id, revision, document);
        Ok(Submission { entry, write })
    }

    /// Replace local entries with the active user's remote document.
    ///
    /// Returns the number of entries loaded. A user without a document starts
    /// with an empty collection.
    pub async fn restore(&self) -> Result<usize, SyncError> {
        let user_id = self
            .identity
            .active_user()
            .ok_or(SyncError::NoActiveSession)?;
        let path = DocumentPath::for_user(&user_id);

        let document = self.store.fetch_document(&path).await.map_err(|err| {
            tracing::warn!(%path, error = %err, "failed to load user document");
            err
        })?;
        let entries = document.unwrap_or_default().incomes;
        let count = entries.len();
        self.load(entries);

        tracing::info!(%path, entries = count, "entries restored");
        Ok(count)
    }

    /// Replace local entries with `entries` without touching the remote store.
    pub fn load(&self, entries: Vec<FinancialEntry>) {
        let mut state = self.lock();
        state.entries = EntryCollection::from(entries);
        self.read_model.send_replace(state.entries.to_vec());
    }

    /// Drop all local entries. Pending writes are left to finish on their own.
    pub fn discard(&self) {
        let mut state = self.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        self.read_model.send_replace(Vec::new());
        tracing::debug!(entries = dropped, "local entries discarded");
    }

    /// Subscribe to the published collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<FinancialEntry>> {
        self.read_model.subscribe()
    }

    pub fn entries(&self) -> Vec<FinancialEntry> {
        self.lock().entries.to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.lock().entries.total()
    }

    fn spawn_replace(
        &self,
        runtime: &Handle,
        user_id: UserId,
        revision: u64,
        document: UserDocument,
    ) -> PendingWrite {
        let store = Arc::clone(&self.store);
        let lane = Arc::clone(&self.lane);

        let handle = runtime.spawn(async move {
            let path = DocumentPath::for_user(&user_id);
            lane.replace(store.as_ref(), &path, revision, &document)
                .await
                .map(|_| ())
        });

        PendingWrite { handle }
    }

    fn lock(&self) -> MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
