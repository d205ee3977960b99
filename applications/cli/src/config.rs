/// CLI configuration
use crate::error::{CliError, Result};
use greenroom_core::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "greenroom.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GreenroomConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub scrobble: ScrobbleSettings,

    #[serde(default)]
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrobbleSettings {
    /// Reported as `source_device` for plays recorded from the command line
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// Streaming platform the play button prefers, e.g. `spotify`
    #[serde(default)]
    pub preferred_platform: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSettings {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl GreenroomConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` must exist when given; otherwise `greenroom.toml` is read if
    /// present. `GREENROOM_*` variables override both, with `__` between
    /// section and key (`GREENROOM_API__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("GREENROOM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(CliError::Config(
                "API base URL is required (set GREENROOM_API__BASE_URL)".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "API base URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(CliError::Config("API timeout must be at least 1 second".to_string()));
        }

        if self.feed.recent_limit == 0 {
            return Err(CliError::Config("feed.recent_limit must be positive".to_string()));
        }

        self.preferred_platform()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// The configured preferred platform, if any
    pub fn preferred_platform(&self) -> Result<Option<Platform>> {
        match self.scrobble.preferred_platform.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some).map_err(CliError::Config),
        }
    }
}

// Default values
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_database_url() -> String {
    "sqlite://./greenroom.db".to_string()
}

fn default_device_name() -> String {
    "greenroom-cli".to_string()
}

fn default_recent_limit() -> u32 {
    20
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for ScrobbleSettings {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            preferred_platform: None,
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}
