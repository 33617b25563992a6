use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use smartcart_core::{DEFAULT_DEBOUNCE, STORAGE_FILE_NAME};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Sheet endpoint URL (e.g. "https://sheet.example.com/api/list")
    pub endpoint_url: Option<String>,
    /// Pull before reads and push after writes automatically (default: false)
    #[serde(default)]
    pub auto_sync: bool,
    /// Pull the remote list when connectivity comes back (default: false)
    #[serde(default)]
    pub resync_on_reconnect: bool,
    /// Debounce window in seconds for automatic pushes
    pub debounce_secs: Option<u64>,
}

impl SyncConfig {
    /// Returns true if sync is configured (has an endpoint_url)
    pub fn is_configured(&self) -> bool {
        self.endpoint_url.is_some()
    }

    /// Debounce window, falling back to the engine default
    pub fn debounce(&self) -> Duration {
        self.debounce_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }
}

/// Offline asset cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// URLs precached by `cart cache warm`
    #[serde(default)]
    pub assets: Vec<String>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the JSON list snapshot
    pub data_path: ConfigValue<PathBuf>,
    /// Root directory for the offline asset cache
    pub cache_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Sync configuration
    pub sync: SyncConfig,
    /// Offline cache configuration
    pub cache: CacheConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    sync: Option<SyncConfig>,
    cache: Option<CacheConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let default_data_path = Self::default_data_dir().join(STORAGE_FILE_NAME);
        let default_cache_dir = Self::default_cache_dir();

        // Start with defaults
        let mut data_path = ConfigValue::new(default_data_path, ConfigSource::Default);
        let mut cache_dir = ConfigValue::new(default_cache_dir, ConfigSource::Default);
        let mut config_file = None;
        let mut sync = SyncConfig::default();
        let mut cache = CacheConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(p) = file_config.data_path {
                // Resolve relative paths against config file's directory
                let resolved = if p.is_relative() {
                    path.parent().map(|d| d.join(&p)).unwrap_or(p)
                } else {
                    p
                };
                data_path = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(p) = file_config.cache_dir {
                cache_dir = ConfigValue::new(p, ConfigSource::File);
            }
            if let Some(sync_config) = file_config.sync {
                sync = sync_config;
            }
            if let Some(cache_config) = file_config.cache {
                cache = cache_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(p) = std::env::var("SMARTCART_DATA_PATH") {
            data_path = ConfigValue::new(PathBuf::from(p), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("SMARTCART_SYNC_URL") {
            sync.endpoint_url = Some(url);
        }

        Ok(Self {
            data_path,
            cache_dir,
            config_file,
            sync,
            cache,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/smartcart/
    /// - macOS: ~/Library/Application Support/smartcart/
    /// - Windows: %APPDATA%/smartcart/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smartcart")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/smartcart/
    /// - macOS: ~/Library/Application Support/smartcart/
    /// - Windows: %APPDATA%/smartcart/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smartcart")
    }

    /// Default cache directory (platform-specific cache dir + smartcart)
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smartcart")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
