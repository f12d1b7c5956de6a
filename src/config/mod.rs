pub mod engine;
pub mod legitimate_domains;

pub use engine::{
    EngineConfig, ExtractionLimits, KeywordCategory, LinkPolicy, NarrativeConfig,
    PaymentIdPolicy, ScoringConfig,
};
pub use legitimate_domains::LegitimateDomainsConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the binaries read from the YAML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<CallbackConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Where and how session reports are delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_callback_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_callback_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_callback_retry_delay")]
    pub retry_delay_ms: u64,
    /// Undelivered reports kept for `flush_pending`; the oldest is dropped beyond this.
    #[serde(default = "default_callback_max_pending")]
    pub max_pending: usize,
}

fn default_callback_timeout() -> u64 {
    10
}

fn default_callback_attempts() -> u32 {
    3
}

fn default_callback_retry_delay() -> u64 {
    500
}

fn default_callback_max_pending() -> usize {
    100
}

impl CallbackConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_seconds: default_callback_timeout(),
            max_attempts: default_callback_attempts(),
            retry_delay_ms: default_callback_retry_delay(),
            max_pending: default_callback_max_pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("keyword category names must not be empty")]
    EmptyCategoryName,
    #[error("keyword category '{0}' is defined more than once")]
    DuplicateCategory(String),
    #[error("keyword category '{category}' contains an empty phrase")]
    EmptyPhrase { category: String },
    #[error("risk bands must satisfy 0 < low ({low}) < medium ({medium}) < high ({high}) <= 100")]
    InvalidRiskBands { low: u32, medium: u32, high: u32 },
    #[error("scam threshold {0} must be within 1..=100")]
    InvalidScamThreshold(u32),
    #[error("invalid confidence settings: {0}")]
    InvalidConfidence(String),
    #[error("failed to compile phrase pattern for '{phrase}': {source}")]
    Pattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in tables.
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if Path::new(path).exists() {
            let config = Self::from_file(path)?;
            log::info!("Loaded configuration from: {path}");
            Ok(config)
        } else {
            log::warn!("Configuration file '{path}' not found, using default configuration");
            Ok(Self::default())
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .map(|logging| logging.level.as_str())
            .unwrap_or("info")
    }
}
