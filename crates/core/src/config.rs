use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::assets::{get_config_dir, get_default_config};

/// Environment variable that overrides the configured chat endpoint.
pub const ENDPOINT_ENV_VAR: &str = "MINISHOP_ENDPOINT";

pub const DEFAULT_GREETING: &str = "Hello! I'm your AI shopping assistant. I can help you find the perfect products based on your needs and budget. What are you looking for today?";

#[derive(Error, Debug)]
pub enum ShopConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub endpoint: Url,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            greeting: default_greeting(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub chat: ChatConfig,
}

fn default_user_id() -> String {
    "demo_user".to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    server: RawServerConfig,
    #[serde(default)]
    chat: ChatConfig,
}

#[derive(Deserialize, Debug)]
struct RawServerConfig {
    endpoint: String,
    timeout_secs: Option<u64>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self, endpoint_override: Option<&str>) -> Result<Config, ShopConfigError> {
        let endpoint_str = match endpoint_override {
            Some(e) if !e.trim().is_empty() => {
                debug!("Using endpoint from {ENDPOINT_ENV_VAR}: {e}");
                e.trim()
            }
            _ => self.server.endpoint.as_str(),
        };

        let endpoint = Url::parse(endpoint_str).map_err(|e| {
            ShopConfigError::Config(format!("Invalid endpoint '{endpoint_str}': {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ShopConfigError::Config(format!(
                "Endpoint '{endpoint_str}' must use http or https"
            )));
        }

        if self.chat.user_id.trim().is_empty() {
            return Err(ShopConfigError::Config(
                "chat.user_id must not be empty".to_string(),
            ));
        }

        let timeout = match self.server.timeout_secs {
            Some(0) => {
                return Err(ShopConfigError::Config(
                    "server.timeout_secs must be greater than zero".to_string(),
                ));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Config {
            server: ServerConfig { endpoint, timeout },
            chat: self.chat.clone(),
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ShopConfigError> {
    let actual_path = match config_path {
        Some(path) => path,
        None => get_config_dir()?.join("minishop.yml"),
    };

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ShopConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

/// Loads the configuration, writing the default file first if it is missing.
///
/// `MINISHOP_ENDPOINT` takes precedence over `server.endpoint`.
#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ShopConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    let endpoint_override = std::env::var(ENDPOINT_ENV_VAR).ok();
    raw.to_config(endpoint_override.as_deref())
}
