//! Remote document store boundary.
//!
//! The store is addressed by [`DocumentPath`](crate::DocumentPath) and only
//! supports whole-document reads and overwrites.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{DocumentStore, StoreError};
