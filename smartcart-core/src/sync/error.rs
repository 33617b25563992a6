//! Sync error types.

use thiserror::Error;

/// Errors from remote sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote payload was not a JSON array of item records.
    #[error("Invalid remote payload: {0}")]
    Decode(String),

    /// Sync is not configured.
    #[error("Sync not configured. Add endpoint_url to config.")]
    NotConfigured,
}
