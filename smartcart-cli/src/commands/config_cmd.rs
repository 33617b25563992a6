use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_path: {}", config.data_path.value.display());
                        println!("  source: {}", config.data_path.source);
                        println!();

                        println!("cache_dir: {}", config.cache_dir.value.display());
                        println!("  source: {}", config.cache_dir.source);
                        println!();

                        match &config.sync.endpoint_url {
                            Some(url) => println!("sync.endpoint_url: {}", url),
                            None => println!("sync.endpoint_url: (not set)"),
                        }
                        println!("sync.auto_sync: {}", config.sync.auto_sync);
                        println!(
                            "sync.resync_on_reconnect: {}",
                            config.sync.resync_on_reconnect
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'cart config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let default_config = r#"# smartcart configuration

# Path to the JSON list snapshot (default: ~/.local/share/smartcart/smartcart-pro-v2.json)
# data_path: ~/.local/share/smartcart/smartcart-pro-v2.json

# Remote sheet sync
# sync:
#   endpoint_url: "https://sheet.example.com/api/list"
#   auto_sync: false
#   resync_on_reconnect: false
#   debounce_secs: 2

# Offline asset cache
# cache:
#   assets:
#     - "https://cdn.example.com/style.css"
"#;

                let mut file = fs::File::create(&config_path)?;
                file.write_all(default_config.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
