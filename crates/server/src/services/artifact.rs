//! Template artifact fetcher.

use std::sync::Arc;

use crate::stores::ObjectStore;

/// Best-effort retrieval of template configuration blobs.
///
/// A missing object and a failed fetch both yield `None` so the
/// orchestrator can substitute the default configuration; hydration is
/// never the reason a run fails.
pub struct ArtifactFetcher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ArtifactFetcher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
        }
    }

    /// Fetch the artifact stored under `storage_key`, if it can be had.
    pub async fn fetch(&self, storage_key: &str) -> Option<String> {
        match self.store.get(&self.bucket, storage_key).await {
            Ok(Some(content)) => Some(content),
            Ok(None) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    "Template artifact not found, falling back to default configuration"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    error = %e,
                    "Template artifact fetch failed, falling back to default configuration"
                );
                None
            }
        }
    }
}
