use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_LOG_FILTER: &str = "live_monitor=info,live_detect=info";

/// Runtime configuration, read from TOML.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin the channel pages are fetched from.
    pub base_url: String,
    /// Deadline for each page fetch, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of channels checked at the same time.
    pub max_concurrent: usize,
    /// Overrides the built-in browser user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub accept_language: String,
    /// JSON file holding the monitored channels.
    pub channels_file: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: live_detect::extractor::platforms::youtube::YouTube::BASE_URL.to_string(),
            request_timeout_secs: live_detect::extractor::DEFAULT_TIMEOUT.as_secs(),
            max_concurrent: 16,
            user_agent: None,
            accept_language: "en-US,en;q=0.9".to_string(),
            channels_file: PathBuf::from("channels.json"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the user config directory, or fall back to defaults.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/live-monitor/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("live-monitor").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        if self.max_concurrent == 0 {
            return Err(Error::config("max_concurrent must be at least 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The effective configuration as TOML.
    pub fn show(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
