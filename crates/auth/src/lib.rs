//! `incometrack-auth` — authenticated session lifecycle.
//!
//! Drives signup/login/logout against an external identity provider and
//! exposes the resulting identity through [`incometrack_core::IdentitySource`].
//! This crate never touches entry data.

pub mod error;
pub mod in_memory;
pub mod manager;
pub mod provider;
pub mod session;

pub use error::SessionError;
pub use in_memory::InMemoryIdentityProvider;
pub use manager::SessionManager;
pub use provider::{IdentityProvider, ProviderError};
pub use session::{Session, SessionFailure, SessionStatus};
