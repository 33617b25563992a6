//! Sync CLI commands for the sheet endpoint.

use std::sync::{Arc, Mutex};

use clap::{Args, Subcommand};

use crate::config::Config;
use smartcart_core::{
    ConnectivityMonitor, ItemStore, JsonFileStore, Persistence, SheetClient, SyncEngine, SyncError,
    SyncPolicy,
};

/// Sync with the remote sheet
#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and endpoint status
    Status,
}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None => self.sync(config).await,
            Some(SyncSubcommand::Status) => self.status(config).await,
        }
    }

    /// Full sync: pull the authoritative list, then push the merged local
    /// snapshot back.
    async fn sync(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let endpoint = config
            .sync
            .endpoint_url
            .as_ref()
            .ok_or(SyncError::NotConfigured)?;

        let client = Arc::new(SheetClient::new(endpoint));
        let online = client.check().await;
        if !online {
            println!("✗ endpoint unreachable, local list left untouched");
            return Ok(());
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

        println!("Syncing with {}...", endpoint);
        engine.load_local()?;
        engine.pull().await;
        engine.push_now().await;

        let count = engine.store().lock().map(|s| s.len()).unwrap_or(0);
        println!("✓ sync complete ({} item(s))", count);
        Ok(())
    }

    async fn status(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        println!("Sync Configuration");
        println!("==================");
        println!();

        if !config.sync.is_configured() {
            println!("Status: Not configured");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  sync:");
            println!("    endpoint_url: \"https://sheet.example.com/api/list\"");
            println!();
            println!("Or set environment variable:");
            println!("  SMARTCART_SYNC_URL");
            return Ok(());
        }

        // is_configured checked above
        let endpoint = config.sync.endpoint_url.as_deref().unwrap_or_default();

        println!("Endpoint:            {}", endpoint);
        println!(
            "Auto-sync:           {}",
            if config.sync.auto_sync {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!(
            "Resync on reconnect: {}",
            if config.sync.resync_on_reconnect {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("Debounce:            {:?}", config.sync.debounce());
        println!();

        let persistence = JsonFileStore::new(config.data_path.value.clone());
        match persistence.load()? {
            Some(items) => println!("Local list:          {} item(s)", items.len()),
            None => println!("Local list:          no saved data"),
        }
        println!();

        let client = SheetClient::new(endpoint);
        if client.check().await {
            println!("Endpoint status: ✓ reachable");
        } else {
            println!("Endpoint status: ✗ unreachable");
        }

        Ok(())
    }
}
