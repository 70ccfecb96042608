//! Session manager: the signup/login/logout state machine.
//!
//! ```text
//! Anonymous ──signup/login──▶ Authenticating ──ok──▶ Authenticated
//!     ▲                             │                    │
//!     │                             └──err──▶ Error ◀────┤ logout err
//!     └────────────────────── logout ok ─────────────────┘
//! ```
//!
//! Only one transition may be in flight at a time. A second signup, login or
//! logout started while one is pending is rejected with [`SessionError::Busy`]
//! instead of racing it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use incometrack_core::{IdentitySource, UserId};

use crate::error::SessionError;
use crate::provider::{IdentityProvider, ProviderError};
use crate::session::{Session, SessionFailure, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Signup,
    Login,
    Logout,
}

impl Transition {
    fn failure(self) -> SessionFailure {
        match self {
            Transition::Signup => SessionFailure::SignupFailed,
            Transition::Login => SessionFailure::LoginFailed,
            Transition::Logout => SessionFailure::LogoutFailed,
        }
    }
}

impl core::fmt::Display for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Transition::Signup => write!(f, "signup"),
            Transition::Login => write!(f, "login"),
            Transition::Logout => write!(f, "logout"),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    in_flight: bool,
}

/// Owns the session for one user at a time.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    state: Mutex<SessionState>,
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag when a transition ends, including when its future
/// is dropped before the provider answers.
struct InFlight<'a> {
    manager: &'a SessionManager,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.manager.lock();
        state.in_flight = false;
        if state.session.status == SessionStatus::Authenticating {
            state.session.status = state.session.settled_status();
        }
    }
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().session.status
    }

    pub fn identity(&self) -> Option<UserId> {
        self.lock().session.identity.clone()
    }

    /// Whether a signup/login/logout call is awaiting the provider.
    pub fn is_busy(&self) -> bool {
        self.lock().in_flight
    }

    /// User-facing message for the current error state.
    pub fn error_message(&self) -> Option<&'static str> {
        self.lock().session.failure().map(|f| f.message())
    }

    /// Create an account and authenticate as it.
    ///
    /// A confirmation mismatch fails before any state change or provider call.
    /// Provider failures of any kind surface as [`SessionError::SignupFailed`].
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserId, SessionError> {
        if password != password_confirm {
            tracing::warn!("signup rejected: password confirmation does not match");
            return Err(SessionError::PasswordMismatch);
        }
        let _in_flight = self.begin(Transition::Signup)?;
        let outcome = self.provider.create_account(email, password).await;
        self.finish_authentication(Transition::Signup, outcome)
    }

    /// Authenticate with an existing account.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserId, SessionError> {
        let _in_flight = self.begin(Transition::Login)?;
        let outcome = self.provider.sign_in(email, password).await;
        self.finish_authentication(Transition::Login, outcome)
    }

    /// End the session.
    ///
    /// On failure the identity is kept: the provider session is assumed to be
    /// still alive.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let _in_flight = self.begin(Transition::Logout)?;
        let outcome = self.provider.terminate_session().await;

        let mut state = self.lock();
        let result = match outcome {
            Ok(()) => {
                let previous = state.session.identity.take();
                state.session.status = SessionStatus::Anonymous;
                match previous {
                    Some(user_id) => tracing::info!(user_id = %user_id, "logout succeeded"),
                    None => tracing::info!("logout succeeded without an active identity"),
                }
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "identity provider rejected logout");
                tracing::warn!("logout failed; keeping current identity");
                state.session.status = SessionStatus::Error(SessionFailure::LogoutFailed);
                Err(SessionError::LogoutFailed)
            }
        };
        drop(state);
        result
    }

    fn finish_authentication(
        &self,
        transition: Transition,
        outcome: Result<UserId, ProviderError>,
    ) -> Result<UserId, SessionError> {
        let mut state = self.lock();
        let result = match outcome {
            Ok(user_id) => {
                if let Some(previous) = state.session.identity.as_ref() {
                    if previous != &user_id {
                        tracing::warn!(previous = %previous, "replacing active session identity");
                    }
                }
                state.session.identity = Some(user_id.clone());
                state.session.status = SessionStatus::Authenticated;
                tracing::info!(user_id = %user_id, "{transition} succeeded");
                Ok(user_id)
            }
            Err(err) => {
                // Provider detail stays in the logs.
                tracing::debug!(error = %err, "identity provider rejected {transition}");
                tracing::warn!("{transition} failed");
                let failure = transition.failure();
                state.session.status = SessionStatus::Error(failure);
                Err(failure.into())
            }
        };
        drop(state);
        result
    }

    fn begin(&self, transition: Transition) -> Result<InFlight<'_>, SessionError> {
        let mut state = self.lock();
        if state.in_flight {
            tracing::warn!("{transition} rejected: another session operation is in flight");
            return Err(SessionError::Busy);
        }

        state.in_flight = true;
        state.session.status = match transition {
            Transition::Signup | Transition::Login => SessionStatus::Authenticating,
            // Logout clears any shown error before calling out.
            Transition::Logout => state.session.settled_status(),
        };
        tracing::debug!("{transition} started");

        Ok(InFlight { manager: self })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Entries may only change while the session is `Authenticated`.
///
/// An identity held through `Authenticating` or any `Error` state, including a
/// failed logout, is not an active user.
impl IdentitySource for SessionManager {
    fn active_user(&self) -> Option<UserId> {
        let state = self.lock();
        match state.session.status {
            SessionStatus::Authenticated => state.session.identity.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryIdentityProvider;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn manager() -> (SessionManager, Arc<InMemoryIdentityProvider>) {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        (SessionManager::new(provider.clone()), provider)
    }

    /// Provider whose calls block until the gate is opened.
    #[derive(Default)]
    struct GatedProvider {
        gate: Notify,
        inner: InMemoryIdentityProvider,
    }

    #[async_trait]
    impl IdentityProvider for GatedProvider {
        async fn create_account(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserId, ProviderError> {
            self.gate.notified().await;
            self.inner.create_account(email, password).await
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
            self.gate.notified().await;
            self.inner.sign_in(email, password).await
        }

        async fn terminate_session(&self) -> Result<(), ProviderError> {
            self.gate.notified().await;
            self.inner.terminate_session().await
        }
    }

    #[tokio::test]
    async fn signup_with_mismatched_passwords_never_calls_provider() {
        let (manager, provider) = manager();

        let err = manager.signup("a@x.com", "p1", "p2").await.unwrap_err();

        assert_eq!(err, SessionError::PasswordMismatch);
        assert_eq!(provider.calls(), 0);
        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(manager.identity().is_none());
    }

    #[tokio::test]
    async fn signup_success_authenticates_with_provider_identity() {
        let (manager, provider) = manager();

        let user_id = manager.signup("a@x.com", "secret", "secret").await.unwrap();

        assert_eq!(manager.status(), SessionStatus::Authenticated);
        assert_eq!(manager.identity(), Some(user_id.clone()));
        assert_eq!(provider.user_for("a@x.com"), Some(user_id));
        assert!(!manager.is_busy());
        assert!(manager.error_message().is_none());
    }

    #[tokio::test]
    async fn signup_failure_hides_provider_detail() {
        let (manager, provider) = manager();
        provider.set_unavailable(true);

        let err = manager.signup("a@x.com", "secret", "secret").await.unwrap_err();

        assert_eq!(err, SessionError::SignupFailed);
        assert_eq!(err.to_string(), "Failed to create an account");
        assert_eq!(
            manager.status(),
            SessionStatus::Error(SessionFailure::SignupFailed)
        );
        assert!(manager.identity().is_none());
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn successful_signup_clears_previous_error() {
        let (manager, provider) = manager();
        provider.set_unavailable(true);
        let _ = manager.signup("a@x.com", "secret", "secret").await;

        provider.set_unavailable(false);
        manager.signup("a@x.com", "secret", "secret").await.unwrap();

        assert_eq!(manager.status(), SessionStatus::Authenticated);
        assert!(manager.error_message().is_none());
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let (manager, provider) = manager();
        provider.create_account("a@x.com", "secret").await.unwrap();

        let err = manager.login("a@x.com", "wrong!").await.unwrap_err();

        assert_eq!(err, SessionError::LoginFailed);
        assert_eq!(
            manager.status(),
            SessionStatus::Error(SessionFailure::LoginFailed)
        );
        assert!(manager.identity().is_none());
    }

    #[tokio::test]
    async fn login_success_returns_registered_identity() {
        let (manager, provider) = manager();
        let registered = provider.create_account("a@x.com", "secret").await.unwrap();

        let user_id = manager.login("a@x.com", "secret").await.unwrap();

        assert_eq!(user_id, registered);
        assert_eq!(manager.active_user(), Some(registered));
    }

    #[tokio::test]
    async fn logout_success_clears_identity() {
        let (manager, _provider) = manager();
        manager.signup("a@x.com", "secret", "secret").await.unwrap();

        manager.logout().await.unwrap();

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(manager.identity().is_none());
        assert!(manager.active_user().is_none());
    }

    #[tokio::test]
    async fn logout_failure_keeps_identity() {
        let (manager, provider) = manager();
        let user_id = manager.signup("a@x.com", "secret", "secret").await.unwrap();
        provider.set_unavailable(true);

        let err = manager.logout().await.unwrap_err();

        assert_eq!(err, SessionError::LogoutFailed);
        assert_eq!(
            manager.status(),
            SessionStatus::Error(SessionFailure::LogoutFailed)
        );
        assert_eq!(manager.identity(), Some(user_id));
        assert_eq!(manager.error_message(), Some("Failed to logout"));
        assert!(manager.active_user().is_none());
    }

    #[tokio::test]
    async fn logout_clears_prior_error_before_calling_provider() {
        let (manager, provider) = manager();
        manager.signup("a@x.com", "secret", "secret").await.unwrap();
        provider.set_unavailable(true);
        let _ = manager.logout().await;

        provider.set_unavailable(false);
        manager.logout().await.unwrap();

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(manager.error_message().is_none());
    }

    #[tokio::test]
    async fn overlapping_logout_is_rejected_while_signup_is_in_flight() {
        let provider = Arc::new(GatedProvider::default());
        let manager = SessionManager::new(provider.clone());

        let signup = manager.signup("a@x.com", "secret", "secret");
        let logout = async {
            let result = manager.logout().await;
            provider.gate.notify_one();
            result
        };
        let (signup, logout) = tokio::join!(signup, logout);

        assert_eq!(logout.unwrap_err(), SessionError::Busy);
        let user_id = signup.unwrap();
        assert_eq!(manager.identity(), Some(user_id));
        assert_eq!(manager.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn no_active_user_while_a_second_signup_is_in_flight() {
        let provider = Arc::new(GatedProvider::default());
        let manager = SessionManager::new(provider.clone());
        let first = async {
            provider.gate.notify_one();
            manager.signup("a@x.com", "secret", "secret").await
        };
        let user_a = first.await.unwrap();
        assert_eq!(manager.active_user(), Some(user_a.clone()));

        let second = manager.signup("b@x.com", "secret", "secret");
        let observe = async {
            tokio::task::yield_now().await;
            let seen = (manager.status(), manager.active_user());
            provider.gate.notify_one();
            seen
        };
        let (second, (status, active)) = tokio::join!(second, observe);

        assert_eq!(status, SessionStatus::Authenticating);
        assert!(active.is_none());
        assert_ne!(second.unwrap(), user_a);
    }

    #[tokio::test]
    async fn failed_resignup_keeps_identity_but_not_active_user() {
        let (manager, provider) = manager();
        let user_id = manager.signup("a@x.com", "secret", "secret").await.unwrap();
        provider.set_unavailable(true);

        let _ = manager.signup("b@x.com", "secret", "secret").await;

        assert_eq!(manager.identity(), Some(user_id));
        assert!(manager.active_user().is_none());
    }

    #[tokio::test]
    async fn abandoned_signup_does_not_leave_session_busy() {
        let provider = Arc::new(GatedProvider::default());
        let manager = SessionManager::new(provider);

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            manager.signup("a@x.com", "secret", "secret"),
        )
        .await;

        assert!(outcome.is_err());
        assert!(!manager.is_busy());
        assert_eq!(manager.status(), SessionStatus::Anonymous);
    }
}
