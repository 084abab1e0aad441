/// Application configuration
use crate::error::{CliError, Result};
use profile_client::{BackendConfig, DEFAULT_AVATAR_BUCKET, DEFAULT_PROFILES_TABLE};
use profile_ui::UiSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "profile.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    /// Project URL, e.g. `https://abc.example.co`
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,

    #[serde(default = "default_avatar_bucket")]
    pub avatar_bucket: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            profiles_table: default_profiles_table(),
            avatar_bucket: default_avatar_bucket(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> BackendConfig {
        BackendConfig::new(&self.url, &self.api_key)
            .with_profiles_table(&self.profiles_table)
            .with_avatar_bucket(&self.avatar_bucket)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

impl AppConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; the default `profile.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::build(path, None)
    }

    fn build(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. PROFILE_BACKEND__URL
        settings = settings.add_source(
            config::Environment::with_prefix("PROFILE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(CliError::Config(
                "Backend URL is required (set PROFILE_BACKEND__URL)".to_string(),
            ));
        }

        if self.backend.api_key.trim().is_empty() {
            return Err(CliError::Config(
                "Backend API key is required (set PROFILE_BACKEND__API_KEY)".to_string(),
            ));
        }

        if self.backend.timeout_secs == 0 {
            return Err(CliError::Config(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }

        let zero = self.ui.zero_delays();
        if !zero.is_empty() {
            return Err(CliError::Config(format!(
                "Notification delays must be greater than zero: {}",
                zero.join(", ")
            )));
        }

        Ok(())
    }
}

// Default values
fn default_profiles_table() -> String {
    DEFAULT_PROFILES_TABLE.to_string()
}

fn default_avatar_bucket() -> String {
    DEFAULT_AVATAR_BUCKET.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
