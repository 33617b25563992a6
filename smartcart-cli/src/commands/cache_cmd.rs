//! Offline asset cache CLI commands.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;
use smartcart_core::{AssetCache, Served};

/// Manage the offline asset cache
#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: CacheSubcommand,
}

#[derive(Subcommand)]
enum CacheSubcommand {
    /// Download and cache every configured asset
    Warm,

    /// Fetch an asset, falling back to the cached copy when offline
    Get {
        /// Asset URL
        url: String,

        /// Write the asset body to a file instead of summarizing it
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

impl CacheCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let cache = AssetCache::new(&config.cache_dir.value);

        match &self.command {
            CacheSubcommand::Warm => {
                if config.cache.assets.is_empty() {
                    println!("No assets configured.");
                    println!();
                    println!("Add to your config file:");
                    println!();
                    println!("  cache:");
                    println!("    assets:");
                    println!("      - \"https://cdn.example.com/style.css\"");
                    return Ok(());
                }

                let cached = cache.precache(&config.cache.assets).await?;
                println!(
                    "Cached {} of {} asset(s) in {}",
                    cached,
                    config.cache.assets.len(),
                    cache.dir().display()
                );
                Ok(())
            }

            CacheSubcommand::Get { url, out } => {
                let (bytes, served) = cache.fetch(url).await?;
                let source = match served {
                    Served::Network => "network",
                    Served::Cache => "cache",
                };

                match out {
                    Some(path) => {
                        fs::write(path, &bytes)?;
                        println!(
                            "Wrote {} byte(s) to {} (from {})",
                            bytes.len(),
                            path.display(),
                            source
                        );
                    }
                    None => {
                        println!("{} byte(s) from {}", bytes.len(), source);
                    }
                }
                Ok(())
            }
        }
    }
}
