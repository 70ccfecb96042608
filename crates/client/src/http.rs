//! HTTP document store.
//!
//! Documents live at `{base_url}/users/{userId}`: `GET` reads one (404 means
//! "never written"), `PUT` overwrites it with the JSON body.

use async_trait::async_trait;
use incometrack_entries::{DocumentPath, DocumentStore, StoreError, UserDocument};

use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreError> {
        if config.store_url.is_empty() {
            return Err(StoreError::Rejected("store URL is empty".to_string()));
        }
        Ok(match &config.store_token {
            Some(token) => Self::with_token(config.store_url.clone(), token.clone()),
            None => Self::new(config.store_url.clone()),
        })
    }

    pub fn document_url(&self, path: &DocumentPath) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn replace_document(
        &self,
        path: &DocumentPath,
        document: &UserDocument,
    ) -> Result<(), StoreError> {
        let url = self.document_url(path);
        let resp = self
            .authorize(self.client.put(&url).json(document))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%url, %status, "document PUT rejected");
            return Err(StoreError::Rejected(format!("{}: {}", status.as_u16(), body)));
        }
        Ok(())
    }

    async fn fetch_document(&self, path: &DocumentPath) -> Result<Option<UserDocument>, StoreError> {
        let url = self.document_url(path);
        let resp = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{}: {}", status.as_u16(), body)));
        }

        let document = resp
            .json::<UserDocument>()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incometrack_core::UserId;

    #[test]
    fn document_url_joins_base_and_path() {
        let store = HttpDocumentStore::new("https://store.example.com/v1/");
        let user: UserId = "uid-9".parse().unwrap();
        assert_eq!(
            store.document_url(&DocumentPath::for_user(&user)),
            "https://store.example.com/v1/users/uid-9"
        );
    }

    #[test]
    fn from_config_carries_token() {
        let config = ClientConfig::new("http://localhost:8080").with_token("abc");
        let store = HttpDocumentStore::from_config(&config).unwrap();
        assert_eq!(store.token.as_deref(), Some("abc"));
    }
}
