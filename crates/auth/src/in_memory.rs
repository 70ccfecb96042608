use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use incometrack_core::UserId;
use uuid::Uuid;

use crate::provider::{IdentityProvider, ProviderError};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
}

/// In-memory identity provider.
///
/// Intended for tests/dev. Passwords are kept in plain text. Outages can be
/// simulated with [`InMemoryIdentityProvider::set_unavailable`].
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identity registered for `email`, if any.
    pub fn user_for(&self, email: &str) -> Option<UserId> {
        let accounts = self.accounts.read().ok()?;
        accounts
            .get(&normalize_email(email))
            .map(|a| a.user_id.clone())
    }

    fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::new("identity provider unavailable"));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn mint_user_id() -> Result<UserId, ProviderError> {
    format!("uid-{}", Uuid::now_v7().simple())
        .parse()
        .map_err(|e| ProviderError::new(format!("failed to mint user id: {e}")))
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        self.enter()?;

        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(ProviderError::new("auth/invalid-email"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new("auth/weak-password"));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| ProviderError::new("lock poisoned"))?;
        if accounts.contains_key(&email) {
            return Err(ProviderError::new("auth/email-already-in-use"));
        }

        let user_id = mint_user_id()?;
        accounts.insert(
            email,
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        self.enter()?;

        let accounts = self
            .accounts
            .read()
            .map_err(|_| ProviderError::new("lock poisoned"))?;
        match accounts.get(&normalize_email(email)) {
            Some(account) if account.password == password => Ok(account.user_id.clone()),
            Some(_) => Err(ProviderError::new("auth/wrong-password")),
            None => Err(ProviderError::new("auth/user-not-found")),
        }
    }

    async fn terminate_session(&self) -> Result<(), ProviderError> {
        self.enter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_account_then_sign_in_returns_same_identity() {
        let provider = InMemoryIdentityProvider::new();
        let created = provider
            .create_account("Alice@Example.com", "secret1")
            .await
            .unwrap();
        let signed_in = provider.sign_in("alice@example.com", "secret1").await.unwrap();
        assert_eq!(created, signed_in);
        assert_eq!(provider.user_for("alice@example.com"), Some(created));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "secret1").await.unwrap();
        let err = provider.create_account("a@x.com", "secret2").await.unwrap_err();
        assert_eq!(err.to_string(), "auth/email-already-in-use");
    }

    #[tokio::test]
    async fn weak_password_and_bad_email_are_rejected() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.create_account("a@x.com", "123").await.is_err());
        assert!(provider.create_account("not-an-email", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn unavailable_provider_fails_every_call() {
        let provider = InMemoryIdentityProvider::new();
        provider.set_unavailable(true);
        assert!(provider.create_account("a@x.com", "secret1").await.is_err());
        assert!(provider.terminate_session().await.is_err());

        provider.set_unavailable(false);
        assert!(provider.terminate_session().await.is_ok());
    }
}
