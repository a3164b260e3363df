use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Settings for the user-directory gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Base URL of the document store's REST gateway.
    pub base_url: String,
    /// Bearer token for the gateway, if it requires one.
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1/".to_string(),
            auth_token: None,
            request_timeout_secs: 10,
        }
    }
}

/// Settings for the push gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub endpoint: String,
    pub server_key: String,
    pub request_timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
            server_key: String::new(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub push: PushConfig,
}

/// Will always return a config, falling back to defaults when the file is
/// missing or unreadable.
pub async fn load_config_from_file(config_path: &PathBuf) -> Config {
    match tokio::fs::read_to_string(config_path).await {
        Ok(raw_config) => match serde_json::from_str(&raw_config) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to parse config file, using defaults: {}", e);
                Config::default()
            }
        },
        Err(_) => {
            tracing::info!("No config file found, using defaults");
            Config::default()
        }
    }
}

/// Saves the config to the given path
pub async fn save_config_to_file(
    config: &Config,
    config_path: &PathBuf,
) -> Result<(), ConfigError> {
    let raw_config = serde_json::to_string_pretty(config)?;
    tokio::fs::write(config_path, raw_config).await?;
    Ok(())
}
