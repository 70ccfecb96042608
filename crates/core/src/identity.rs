//! Read-only view of the authenticated identity.
//!
//! Components that address per-user data depend on this trait rather than on
//! the session manager itself, which keeps entry handling free of auth state.

use std::sync::Arc;

use crate::id::UserId;

/// Source of the currently authenticated user, if any.
pub trait IdentitySource: Send + Sync {
    /// Identity of the active session, or `None` while signed out.
    fn active_user(&self) -> Option<UserId>;
}

impl<S> IdentitySource for Arc<S>
where
    S: IdentitySource + ?Sized,
{
    fn active_user(&self) -> Option<UserId> {
        (**self).active_user()
    }
}
