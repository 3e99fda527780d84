//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; the marketplace app token can
//! be supplied through the `CARDWATCH_APP_TOKEN` environment variable so
//! it never has to live in the file. Invalid values are rejected at
//! startup ([`ConfigError`]) - never at cycle time.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::domain::Thresholds;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Polling cadence and per-cycle concurrency.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Relative price-movement thresholds for alerting.
    #[serde(default)]
    pub thresholds: Thresholds,

    /// History store location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Marketplace API endpoint settings.
    #[serde(default)]
    pub marketplace: MarketplaceConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Products to track, read into the watchlist at startup.
    #[serde(default)]
    pub watchlist: Vec<WatchEntryConfig>,
}

/// Settings for the polling scheduler.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds between the end of one cycle and the next tick.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Upper bound on concurrently processed watch items per cycle.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

fn default_interval_seconds() -> u64 {
    900
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

/// History store location settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for history store files and exports.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// SQLite database URL inside the data directory.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.data_dir.join("history.db").display())
    }

    /// Directory CSV exports are written to.
    #[must_use]
    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    /// Create the data directories required by the application.
    ///
    /// # Errors
    /// Returns an error when a directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.exports_dir())?;
        Ok(())
    }
}

/// Marketplace API endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout; a hung fetch is bounded here, not in the core.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Application token, normally injected via `CARDWATCH_APP_TOKEN`.
    #[serde(default)]
    pub app_token: Option<String>,
}

fn default_api_url() -> String {
    "https://api.cardmarket.com/ws/v2.0/output.json".into()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout(),
            app_token: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

/// One `[[watchlist]]` entry from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEntryConfig {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub min_quantity: Option<u32>,
}

impl Config {
    /// Load configuration from a TOML file, applying environment
    /// overrides for sensitive values.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;

        if let Ok(token) = std::env::var("CARDWATCH_APP_TOKEN") {
            if !token.is_empty() {
                config.marketplace.app_token = Some(token);
            }
        }

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on parse or validation failure.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Initialize logging per the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn validate(&self) -> Result<()> {
        if self.polling.interval_seconds == 0 {
            return Err(invalid("polling.interval_seconds", "must be at least 1"));
        }
        if self.polling.max_concurrent_requests == 0 {
            return Err(invalid(
                "polling.max_concurrent_requests",
                "must be at least 1",
            ));
        }
        if self.thresholds.drop_ratio < Decimal::ZERO {
            return Err(invalid("thresholds.drop_ratio", "must not be negative"));
        }
        if self.thresholds.rise_ratio < Decimal::ZERO {
            return Err(invalid("thresholds.rise_ratio", "must not be negative"));
        }
        if self.marketplace.request_timeout_seconds == 0 {
            return Err(invalid(
                "marketplace.request_timeout_seconds",
                "must be at least 1",
            ));
        }
        if let Err(e) = Url::parse(&self.marketplace.api_url) {
            return Err(invalid("marketplace.api_url", &e.to_string()));
        }
        for entry in &self.watchlist {
            if entry.product_id.is_empty() {
                return Err(invalid("watchlist.product_id", "must not be empty"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
