//! Client configuration.

use anyhow::{Context, bail};

/// Default store location for local development.
pub const DEFAULT_STORE_URL: &str = "http://localhost:8080";

/// Where the remote user documents live and how to authenticate to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub store_url: String,
    pub store_token: Option<String>,
}

impl ClientConfig {
    pub const STORE_URL_VAR: &'static str = "INCOMETRACK_STORE_URL";
    pub const STORE_TOKEN_VAR: &'static str = "INCOMETRACK_STORE_TOKEN";

    pub fn new(store_url: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            store_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.store_token = Some(token.into());
        self
    }

    /// Load from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
            .context("failed to load client configuration from environment")
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store_url = match lookup(Self::STORE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => {
                tracing::warn!(
                    "{} not set; using dev default {}",
                    Self::STORE_URL_VAR,
                    DEFAULT_STORE_URL
                );
                DEFAULT_STORE_URL.to_string()
            }
        };

        if !(store_url.starts_with("http://") || store_url.starts_with("https://")) {
            bail!(
                "{} must be an http(s) URL, got '{}'",
                Self::STORE_URL_VAR,
                store_url
            );
        }

        let store_token = lookup(Self::STORE_TOKEN_VAR).filter(|v| !v.trim().is_empty());

        Ok(Self {
            store_url,
            store_token,
        })
    }
}
