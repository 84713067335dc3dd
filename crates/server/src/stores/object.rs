//! HTTP object storage client.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::stores::ObjectStore;

/// Object storage client speaking plain HTTP GET against an S3-compatible
/// path layout (`{url}/{bucket}/{key}`).
#[derive(Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    /// Create a new client for the given endpoint.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Option<String>> {
        let url = format!("{}/{}/{}", self.base_url, bucket, key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ObjectStore(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let content = response
                    .text()
                    .await
                    .map_err(|e| AppError::ObjectStore(e.to_string()))?;
                Ok(Some(content))
            }
            status => Err(AppError::ObjectStore(format!(
                "Object storage returned {} for {}",
                status, url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = HttpObjectStore::new("http://localhost:9000/");
        assert_eq!(store.base_url, "http://localhost:9000");
    }
}
