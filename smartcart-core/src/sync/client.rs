//! HTTP client for the sheet-backed sync endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::SyncError;
use crate::models::Item;

/// Timeout applied to every request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote side of the sync engine, injected so tests can substitute a mock.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetches the authoritative item list.
    async fn pull(&self) -> Result<Vec<Item>, SyncError>;

    /// Sends the full local list to the remote store.
    async fn push(&self, items: &[Item]) -> Result<(), SyncError>;
}

/// Client for the fixed sheet endpoint.
///
/// GET returns a JSON array of item records; POST accepts the same array
/// as an opaque write.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SheetClient {
    /// Creates a new client for the given endpoint URL.
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Lightweight reachability probe for the connectivity monitor.
    ///
    /// Any response, whatever its status, counts as reachable; only a
    /// transport failure means offline.
    pub async fn check(&self) -> bool {
        self.client.head(&self.endpoint).send().await.is_ok()
    }
}

#[async_trait]
impl RemoteClient for SheetClient {
    async fn pull(&self) -> Result<Vec<Item>, SyncError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("pull response status: {}", status);

        if !status.is_success() {
            return Err(SyncError::Decode(format!("status {}", status)));
        }

        serde_json::from_str(&body).map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// Fire-and-forget write: push success is defined as "the request
    /// returned network-success". The response is never inspected, so a
    /// remote write the endpoint silently dropped is indistinguishable
    /// from one it applied.
    async fn push(&self, items: &[Item]) -> Result<(), SyncError> {
        self.client.post(&self.endpoint).json(&items).send().await?;
        debug!("pushed {} item(s)", items.len());
        Ok(())
    }
}
