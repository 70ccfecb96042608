//! `incometrack-client`
//!
//! **Responsibility:** composition root for the finance tracker core.
//!
//! This crate provides:
//! - [`FinanceClient`], wiring the session manager to the entry synchronizer
//! - entry-state teardown on logout and restoration on login/signup
//! - configuration loading ([`ClientConfig`])
//! - an HTTP document store (feature `http`)
//!
//! UI shells call into this crate; it owns no presentation logic.

pub mod client;
pub mod config;
#[cfg(feature = "http")]
pub mod http;

pub use client::{ClientError, EntriesView, FinanceClient, SessionView};
pub use config::ClientConfig;
#[cfg(feature = "http")]
pub use http::HttpDocumentStore;
pub use incometrack_observability::init as init_tracing;
