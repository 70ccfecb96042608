//! Session operation errors.

use thiserror::Error;

use crate::session::SessionFailure;

/// Error returned by session operations.
///
/// Messages are user-facing. Provider detail is deliberately absent: it is
/// logged at debug level and never carried in these variants.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Failed to create an account")]
    SignupFailed,

    #[error("Failed to log in")]
    LoginFailed,

    #[error("Failed to logout")]
    LogoutFailed,

    /// Another signup/login/logout is still in flight.
    #[error("another session operation is in progress")]
    Busy,
}

impl From<SessionFailure> for SessionError {
    fn from(value: SessionFailure) -> Self {
        match value {
            SessionFailure::SignupFailed => SessionError::SignupFailed,
            SessionFailure::LoginFailed => SessionError::LoginFailed,
            SessionFailure::LogoutFailed => SessionError::LogoutFailed,
        }
    }
}
