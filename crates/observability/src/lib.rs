//! Process-wide logging setup.
//!
//! Library crates only emit `tracing` events; whoever owns the process calls
//! [`init`] once at startup.

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
