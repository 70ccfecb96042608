//! `incometrack-entries` — financial entries and their remote mirror.
//!
//! The [`EntrySynchronizer`] owns the authoritative, insertion-ordered list of
//! entries for the active session. Every accepted entry is appended locally,
//! published to subscribers, and then persisted by overwriting the user's whole
//! remote document (`users/{userId}`).

pub mod amount;
pub mod category;
pub mod clock;
pub mod document;
pub mod entry;
pub mod error;
pub mod form;
pub mod store;
pub mod synchronizer;

pub use amount::Amount;
pub use category::Category;
pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{DocumentPath, UserDocument};
pub use entry::{EntryCollection, FinancialEntry};
pub use error::{EntryError, SyncError};
pub use form::{EntryDraft, EntryForm};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
pub use synchronizer::{EntrySynchronizer, PendingWrite, Submission};
