//! Configuration module for draftsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides `remote.access_token`.
pub const ACCESS_TOKEN_ENV: &str = "DRAFTSYNC_ACCESS_TOKEN";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for draftsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Local draft store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File holding the persisted draft list.
    pub path: PathBuf,
}

/// Server-of-record settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the drafts API, without a trailing slash.
    pub base_url: String,
    /// Bearer token. `None` means the client runs unauthenticated.
    pub access_token: Option<String>,
}

/// Reconciliation and remote call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of drafts requested per `list` page.
    pub page_size: u32,
    /// Upper bound in seconds on any single remote call.
    pub remote_timeout_secs: u64,
}

/// Export snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory where export files are written.
    pub directory: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/draftsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("draftsync")
            .join("config.yaml")
    }

    /// Effective access token: the environment variable wins over the file.
    pub fn access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.remote.access_token.clone())
    }
}

// ---------------------------------------------------------------------------
// Section defaults
// ---------------------------------------------------------------------------

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("draftsync")
                .join("drafts.json"),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            access_token: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            remote_timeout_secs: 30,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.page_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- store ---
        if self.store.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "store.path".into(),
                message: "must not be empty".into(),
            });
        }

        // --- remote ---
        let base_url = self.remote.base_url.as_str();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: format!("must be an http(s) URL: {base_url}"),
            });
        } else if base_url.ends_with('/') {
            errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: "must not end with '/'".into(),
            });
        }
        if matches!(&self.remote.access_token, Some(token) if token.trim().is_empty()) {
            errors.push(ValidationError {
                field: "remote.access_token".into(),
                message: "must not be blank when set".into(),
            });
        }

        // --- sync ---
        if self.sync.page_size == 0 {
            errors.push(ValidationError {
                field: "sync.page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.remote_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "sync.remote_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use draftsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .store_path(PathBuf::from("/tmp/drafts.json"))
///     .sync_page_size(50)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn store_path(mut self, path: PathBuf) -> Self {
        self.config.store.path = path;
        self
    }

    pub fn remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.base_url = url.into();
        self
    }

    pub fn remote_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.remote.access_token = Some(token.into());
        self
    }

    pub fn sync_page_size(mut self, page_size: u32) -> Self {
        self.config.sync.page_size = page_size;
        self
    }

    pub fn sync_remote_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.sync.remote_timeout_secs = seconds;
        self
    }

    pub fn export_directory(mut self, directory: PathBuf) -> Self {
        self.config.export.directory = directory;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
