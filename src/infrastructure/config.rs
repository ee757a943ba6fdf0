//! Configuration infrastructure
//!
//! Configuration is read from a single JSON file. Every section has defaults,
//! so a partial file (or no file at all) yields a working setup. A few values
//! can be overridden from the environment for container deployments.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Query API listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Outbound HTTP settings used for all retailer requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout; a hung retailer fails the update run after this
    pub request_timeout_seconds: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
}

/// Catalog ingestion and persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Snapshot file used as cold-start seed and written after every update
    pub snapshot_path: PathBuf,
    /// Run the retailer update in the background at startup
    pub update_on_startup: bool,
    /// Page size used by the query API when the client does not send one
    pub products_per_page: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs (file output only)
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(defaults::SNAPSHOT_FILE),
            update_on_startup: true,
            products_per_page: defaults::PRODUCTS_PER_PAGE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("actix_server".to_string(), "info".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Apply `LEFTY_HOST`, `LEFTY_PORT` and `LEFTY_SNAPSHOT_PATH` on top of the file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("LEFTY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LEFTY_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid LEFTY_PORT: {}", port))?;
        }
        if let Ok(path) = std::env::var("LEFTY_SNAPSHOT_PATH") {
            self.catalog.snapshot_path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("lefty");

        Ok(config_dir)
    }

    /// Configuration manager for `LEFTY_CONFIG`, or the per-user default location
    pub fn new() -> Result<Self> {
        if let Ok(path) = std::env::var("LEFTY_CONFIG") {
            return Ok(Self::with_path(path));
        }

        let config_path = Self::get_config_dir()?.join("lefty_config.json");
        Ok(Self { config_path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file is invalid: {}", parse_error);
                warn!("⚠️  Resetting to default configuration");

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

/// Retailer website URLs
pub mod retailer_urls {
    /// Musik Produktiv storefront (HTML listing pages)
    pub const MUSIK_PRODUKTIV_BASE: &str = "https://www.musik-produktiv.de";

    /// Thomann German storefront (listing pages with embedded JSON)
    pub const THOMANN_BASE: &str = "https://www.thomann.de/de";

    /// Thomann product thumbnails, joined with the image file name
    pub const THOMANN_THUMBNAIL_BASE: &str =
        "https://thumbs.static-thomann.de/thumb/thumb220x220/pics/prod";
}

/// Default configuration values
pub mod defaults {
    pub const SERVER_HOST: &str = "127.0.0.1";

    pub const SERVER_PORT: u16 = 5000;

    /// Retailers are slow but a listing page should never take longer than this
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 5;

    pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; lefty/0.3)";

    pub const SNAPSHOT_FILE: &str = "products.json";

    pub const PRODUCTS_PER_PAGE: u32 = crate::domain::DEFAULT_PRODUCTS_PER_PAGE;

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = true;

    pub const LOG_FILE_NAME: &str = "lefty.log";
}
