//! `incometrack-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no async runtime).

pub mod entity;
pub mod error;
pub mod id;
pub mod identity;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{EntryId, UserId};
pub use identity::IdentitySource;
pub use value_object::ValueObject;
