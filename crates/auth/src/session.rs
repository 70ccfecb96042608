//! Session state: identity + lifecycle status.

use incometrack_core::UserId;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Failure reasons
// ─────────────────────────────────────────────────────────────────────────────

/// Why the last session operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionFailure {
    SignupFailed,
    LoginFailed,
    LogoutFailed,
}

impl SessionFailure {
    /// Message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            SessionFailure::SignupFailed => "Failed to create an account",
            SessionFailure::LoginFailed => "Failed to log in",
            SessionFailure::LogoutFailed => "Failed to logout",
        }
    }
}

impl core::fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionFailure::SignupFailed => write!(f, "SignupFailed"),
            SessionFailure::LoginFailed => write!(f, "LoginFailed"),
            SessionFailure::LogoutFailed => write!(f, "LogoutFailed"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    #[default]
    Anonymous,
    /// A signup or login call is in flight.
    Authenticating,
    Authenticated,
    /// Last operation failed; the session can retry any operation from here.
    Error(SessionFailure),
}

impl core::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionStatus::Anonymous => write!(f, "Anonymous"),
            SessionStatus::Authenticating => write!(f, "Authenticating"),
            SessionStatus::Authenticated => write!(f, "Authenticated"),
            SessionStatus::Error(reason) => write!(f, "Error({reason})"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of the session.
///
/// # Invariants
/// - `status == Authenticated` implies `identity.is_some()`.
/// - `status == Anonymous` implies `identity.is_none()`.
/// - A failed logout keeps the identity it started with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub identity: Option<UserId>,
    pub status: SessionStatus,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// The failure currently shown to the user, if any.
    pub fn failure(&self) -> Option<SessionFailure> {
        match self.status {
            SessionStatus::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// Status the session falls back to once an error is cleared.
    pub(crate) fn settled_status(&self) -> SessionStatus {
        if self.identity.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}
