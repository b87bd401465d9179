//! # Configuration
//!
//! Runtime settings for one invocation. Tunables come from an optional YAML file
//! (`--config`), secrets come from the command line / environment and never
//! touch the YAML. Every section has defaults, so an absent file is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads the YAML file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.telegram.request_timeout_secs <= self.telegram.poll_timeout_secs {
            anyhow::bail!(
                "telegram.request_timeout_secs ({}) must exceed telegram.poll_timeout_secs ({})",
                self.telegram.request_timeout_secs,
                self.telegram.poll_timeout_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Long-poll wait passed to `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_poll_timeout() -> u64 {
    20
}
fn default_request_timeout() -> u64 {
    30
}

/// Key names inside the key-value store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_state_key")]
    pub state_key: String,
    #[serde(default = "default_cursor_key")]
    pub cursor_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_key: default_state_key(),
            cursor_key: default_cursor_key(),
        }
    }
}

fn default_state_key() -> String {
    "telegram_bot_data".to_string()
}
fn default_cursor_key() -> String {
    "telegram_bot_offset".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for the file log. No file log when unset.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> String {
    "codekeeper.log".to_string()
}

/// Secrets supplied by the process environment.
#[derive(Clone)]
pub struct Credentials {
    pub api_token: String,
    pub redis_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("redis_url", &self.redis_url)
            .finish()
    }
}
