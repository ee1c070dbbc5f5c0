//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$GMAILGRAB_CONFIG` (environment variable)
//! 2. `~/.config/gmailgrab/config.toml` (Linux/macOS)
//!    `%APPDATA%\gmailgrab\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::Filter;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Message listing page sizes.
    pub listing: ListingConfig,
    /// Batch sizes and the inter-window cooldown.
    pub batching: BatchingConfig,
    /// API endpoint settings.
    pub api: ApiConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where attachments are written.
    pub output_dir: PathBuf,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Page sizes for the paginated listing call, one per filter mode.
///
/// Larger pages mean fewer round trips; the API caps `maxResults` at 500.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size when filtering by label.
    pub label_page_size: u32,
    /// Page size when filtering by sender.
    pub from_page_size: u32,
    /// Page size when listing every message.
    pub all_page_size: u32,
}

/// Concurrency-window tuning.
///
/// Requests are issued in windows of `*_batch_size` concurrent calls; each
/// window fully drains before the next starts. The cooldown between
/// message-detail windows keeps the run under the API's per-time-window
/// rate limit — it is not a retry mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    /// Concurrent message-detail fetches per window.
    pub message_batch_size: usize,
    /// Sleep between message-detail windows, in milliseconds.
    pub cooldown_ms: u64,
    /// Concurrent per-message attachment groups per window.
    pub attachment_batch_size: usize,
}

/// API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Gmail REST API. Only worth changing to point the
    /// tool at a local test server.
    pub base_url: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("files"),
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            label_page_size: 200,
            from_page_size: 50,
            all_page_size: 500,
        }
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            message_batch_size: 100,
            cooldown_ms: 3000,
            attachment_batch_size: 100,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::api::gmail::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ListingConfig {
    /// Page size for a given filter mode.
    pub fn page_size_for(&self, filter: &Filter) -> u32 {
        match filter {
            Filter::Label(_) => self.label_page_size,
            Filter::From(_) => self.from_page_size,
            Filter::All => self.all_page_size,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("GMAILGRAB_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("gmailgrab").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gmailgrab")
}
