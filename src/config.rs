use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ",
            ConfigError::Parse { .. } => "CONFIG_PARSE",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Wire-level request/response logging (target `wire`)
    #[serde(default)]
    pub enable_tracing: bool,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub transfer: TransferDefaults,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cdp_api_key.json"),
        }
    }
}

/// Remote API endpoint and token settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Lifetime of each per-request bearer token
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    /// Unset means the HTTP client's own default applies
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_token_ttl_secs() -> i64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coinbase.com".to_string(),
            token_ttl_secs: default_token_ttl_secs(),
            request_timeout_secs: None,
        }
    }
}

/// Per-environment defaults for the `send` command. Command-line flags win.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferDefaults {
    pub account_id: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for TransferDefaults {
    fn default() -> Self {
        Self {
            account_id: "primary".to_string(),
            recipient: None,
            amount: None,
            currency: None,
            description: None,
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(format!("config/{}.yaml", env))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}
