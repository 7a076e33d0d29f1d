//! Configuration management for the `spaceadmin` client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the optional configuration file (any format `config` understands)
pub const CONFIG_FILE_NAME: &str = "spaceadmin";

/// Prefix for configuration environment variables, e.g. `SPACEADMIN_API__BASE_URL`
pub const ENV_PREFIX: &str = "SPACEADMIN";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Page behaviour configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every relative endpoint is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the session file; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Page behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Delay before a successful form redirects to its list page
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,

    /// User type assumed when the login response does not carry one
    #[serde(default = "default_user_type")]
    pub default_user_type: i64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_page_size() -> u32 {
    10
}

const fn default_redirect_delay_ms() -> u64 {
    1500
}

const fn default_user_type() -> i64 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            redirect_delay_ms: default_redirect_delay_ms(),
            default_user_type: default_user_type(),
        }
    }
}

impl StorageConfig {
    /// Resolve the session file location
    ///
    /// # Errors
    ///
    /// Returns an error when no path is configured and the platform has no
    /// home directory to derive one from.
    pub fn resolved_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        directories::ProjectDirs::from("com", "spaceadmin", "spaceadmin")
            .map(|dirs| dirs.data_dir().join("session.json"))
            .ok_or_else(|| {
                crate::Error::configuration("cannot determine a data directory; set storage.path")
            })
    }
}

impl Config {
    /// Load configuration from the optional `spaceadmin.*` file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.checked(CONFIG_FILE_NAME)
    }

    /// Load configuration from an explicit file, still honouring the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.checked(&path.display().to_string())
    }

    fn checked(self, source: &str) -> crate::Result<Self> {
        if let Err(e) = self.validate() {
            warn!(source, error = %e, "rejected configuration");
            return Err(e);
        }
        debug!(source, base_url = %self.api.base_url, "configuration loaded");
        Ok(self)
    }

    /// Check values that would otherwise fail late
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending setting.
    pub fn validate(&self) -> crate::Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(crate::Error::configuration("api.base_url must not be empty"));
        }
        if !crate::utils::is_absolute_url(base) {
            return Err(crate::Error::configuration(format!(
                "api.base_url must start with http:// or https://, got '{base}'"
            )));
        }
        if self.ui.page_size == 0 {
            return Err(crate::Error::configuration("ui.page_size must be at least 1"));
        }
        if self.api.request_timeout_secs == Some(0) {
            return Err(crate::Error::configuration(
                "api.request_timeout_secs must be positive; omit it to disable the timeout",
            ));
        }
        Ok(())
    }
}
