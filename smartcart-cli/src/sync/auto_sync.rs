//! Auto-sync hooks for CLI commands.
//!
//! When `auto_sync` is enabled, read commands pull the remote list first
//! and write commands push the updated snapshot afterwards. Every failure
//! degrades gracefully: the CLI keeps working from the local snapshot
//! when the endpoint is down.

use std::sync::{Arc, Mutex};

use crate::config::Config;
use smartcart_core::{
    ConnectivityMonitor, ItemStore, JsonFileStore, Persistence, RemoteClient, SheetClient,
    SyncEngine, SyncPolicy,
};

/// Pulls the remote list into the local snapshot before a read command.
pub async fn try_auto_pull(config: &Config) {
    let Some(endpoint) = enabled_endpoint(config) else {
        return;
    };

    let client = Arc::new(SheetClient::new(endpoint));
    if !client.check().await {
        eprintln!("Auto-sync: endpoint unreachable, skipping");
        return;
    }

    let engine = SyncEngine::new(
        Arc::new(Mutex::new(ItemStore::new())),
        Arc::new(JsonFileStore::new(config.data_path.value.clone())),
        client,
        Arc::new(ConnectivityMonitor::new(true)),
        SyncPolicy {
            debounce: config.sync.debounce(),
            resync_on_reconnect: config.sync.resync_on_reconnect,
        },
    );

    if let Err(e) = engine.load_local() {
        eprintln!("Auto-sync: {}", e);
        return;
    }
    engine.pull().await;
}

/// Pushes the persisted snapshot after a successful write command.
///
/// The command already wrote the snapshot to disk, so a pull here would
/// clobber the change it just made; only the push side runs.
pub async fn try_auto_push(config: &Config) {
    let Some(endpoint) = enabled_endpoint(config) else {
        return;
    };

    let client = SheetClient::new(endpoint);
    if !client.check().await {
        eprintln!("Auto-sync: endpoint unreachable, skipping");
        return;
    }

    let persistence = JsonFileStore::new(config.data_path.value.clone());
    let snapshot = match persistence.load() {
        Ok(Some(items)) => ItemStore::from_items(items).snapshot_for_sync(),
        Ok(None) => return,
        Err(e) => {
            eprintln!("Auto-sync: {}", e);
            return;
        }
    };

    if let Err(e) = client.push(&snapshot).await {
        eprintln!("Auto-sync: {}", e);
    }
}

fn enabled_endpoint(config: &Config) -> Option<&str> {
    if !config.sync.auto_sync {
        return None;
    }
    let endpoint = config.sync.endpoint_url.as_deref();
    if endpoint.is_none() {
        tracing::debug!("auto_sync enabled but no endpoint configured");
    }
    endpoint
}
