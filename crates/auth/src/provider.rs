//! External identity provider seam.

use async_trait::async_trait;
use incometrack_core::UserId;
use std::sync::Arc;
use thiserror::Error;

/// Opaque provider failure.
///
/// Providers report causes as free-form text; callers must not branch on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Account and session primitives of an external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in, returning the new identity.
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId, ProviderError>;

    /// Sign in to an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, ProviderError>;

    /// End the provider-side session.
    async fn terminate_session(&self) -> Result<(), ProviderError>;
}

#[async_trait]
impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        (**self).create_account(email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        (**self).sign_in(email, password).await
    }

    async fn terminate_session(&self) -> Result<(), ProviderError> {
        (**self).terminate_session().await
    }
}
