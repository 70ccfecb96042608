//! Finance client: one session and the entries that belong to it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use incometrack_auth::{IdentityProvider, Session, SessionError, SessionManager, SessionStatus};
use incometrack_core::{IdentitySource, UserId};
use incometrack_entries::{
    DocumentStore, EntryError, EntryForm, EntrySynchronizer, FinancialEntry, Submission,
    SyncError,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    /// Authenticated, but the user's entries could not be loaded.
    #[error("signed in, but entries could not be loaded: {0}")]
    Restore(#[from] SyncError),

    /// The session's entries are not loaded yet, so a write would drop them remotely.
    #[error("entries are not loaded for this session")]
    EntriesNotLoaded,
}

/// Composes the session manager with the entry synchronizer.
///
/// The session never touches entries. This type turns session transitions into
/// entry lifecycle: entries are loaded after signup/login and discarded after a
/// successful logout. Submissions are refused until the session's entries have
/// been loaded, since each write replaces the whole remote document.
#[derive(Debug)]
pub struct FinanceClient {
    session: Arc<SessionManager>,
    entries: EntrySynchronizer,
    restored: AtomicBool,
}

impl FinanceClient {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        let session = Arc::new(SessionManager::new(provider));
        let entries = EntrySynchronizer::new(session.clone(), store);
        Self {
            session,
            entries,
            restored: AtomicBool::new(false),
        }
    }

    /// Client backed by the HTTP document store described by `config`.
    #[cfg(feature = "http")]
    pub fn connect(
        config: &crate::config::ClientConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;

        let store = crate::http::HttpDocumentStore::from_config(config)
            .context("failed to build HTTP document store")?;
        Ok(Self::new(provider, Arc::new(store)))
    }

    /// Read-only view of the session. Transitions go through the client.
    pub fn session(&self) -> SessionView<'_> {
        SessionView {
            manager: &self.session,
        }
    }

    /// Read-only view of the local entries. Submissions go through the client.
    pub fn entries(&self) -> EntriesView<'_> {
        EntriesView {
            entries: &self.entries,
        }
    }

    /// Whether the active session's entries have been loaded.
    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }

    /// Create an account, then load its (normally empty) entries.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserId, ClientError> {
        self.restored.store(false, Ordering::SeqCst);
        let user_id = self.session.signup(email, password, password_confirm).await?;
        self.start_session(&user_id).await?;
        Ok(user_id)
    }

    /// Sign in, then load the user's entries from their remote document.
    ///
    /// If loading fails the session stays authenticated and
    /// [`ClientError::Restore`] is returned; call [`FinanceClient::restore`] to
    /// retry. Until then submissions fail with [`ClientError::EntriesNotLoaded`].
    pub async fn login(&self, email: &str, password: &str) -> Result<UserId, ClientError> {
        self.restored.store(false, Ordering::SeqCst);
        let user_id = self.session.login(email, password).await?;
        self.start_session(&user_id).await?;
        Ok(user_id)
    }

    /// Reload entries for the active session.
    pub async fn restore(&self) -> Result<usize, ClientError> {
        let loaded = self.entries.restore().await?;
        self.restored.store(true, Ordering::SeqCst);
        Ok(loaded)
    }

    /// End the session and drop its entries.
    ///
    /// When the provider refuses, the session and its entries are both kept.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session.logout().await?;
        self.restored.store(false, Ordering::SeqCst);
        self.entries.discard();
        Ok(())
    }

    pub fn submit_entry(&self, form: &mut EntryForm) -> Result<Submission, ClientError> {
        if self.session.active_user().is_some() && !self.is_restored() {
            tracing::warn!("entry rejected: session entries not loaded");
            return Err(ClientError::EntriesNotLoaded);
        }
        Ok(self.entries.submit_entry(form)?)
    }

    async fn start_session(&self, user_id: &UserId) -> Result<(), ClientError> {
        // A new identity never sees the previous one's entries.
        self.entries.discard();
        let loaded = self.restore().await?;
        tracing::info!(user_id = %user_id, entries = loaded, "session started");
        Ok(())
    }
}

/// Session state as seen through a [`FinanceClient`].
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    manager: &'a SessionManager,
}

impl SessionView<'_> {
    pub fn snapshot(&self) -> Session {
        self.manager.session()
    }

    pub fn status(&self) -> SessionStatus {
        self.manager.status()
    }

    pub fn identity(&self) -> Option<UserId> {
        self.manager.identity()
    }

    pub fn is_busy(&self) -> bool {
        self.manager.is_busy()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.manager.error_message()
    }
}

/// Local entries as seen through a [`FinanceClient`].
#[derive(Debug, Clone, Copy)]
pub struct EntriesView<'a> {
    entries: &'a EntrySynchronizer,
}

impl EntriesView<'_> {
    pub fn entries(&self) -> Vec<FinancialEntry> {
        self.entries.entries()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.entries.total()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<FinancialEntry>> {
        self.entries.subscribe()
    }
}
