//! Server configuration.
//!
//! Settings come from an optional TOML file (path in `ADE_MCP_CONFIG`),
//! then environment overrides. A `.env` file in the working directory is
//! loaded first, so credentials can live next to the client config.

use ade_engine::{EngineConfig, EngineKind};
use ade_schema::SchemaRules;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the LandingAI API key
pub const API_KEY_VAR: &str = "VISION_AGENT_API_KEY";

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_VAR: &str = "ADE_MCP_CONFIG";

/// Environment variable selecting the engine ("http" or "mock")
pub const ENGINE_VAR: &str = "ADE_ENGINE";

/// Environment variable overriding the API endpoint
pub const ENDPOINT_VAR: &str = "ADE_ENDPOINT";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A `.env` file exists but could not be loaded
    #[error("Failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// HTTP engine selected without credentials
    #[error("Missing required environment variable: VISION_AGENT_API_KEY")]
    MissingApiKey,

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Extraction engine settings
    pub engine: EngineConfig,

    /// Schema conformance rules
    pub schema: SchemaRules,

    /// API key (environment only, never read from or written to the file)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `.env`, the optional config file, and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        check_env_file(dotenvy::dotenv())?;
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for environment access
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(kind) = lookup(ENGINE_VAR) {
            config.engine.kind = kind.parse::<EngineKind>().map_err(ConfigError::Invalid)?;
        }
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.engine.endpoint = endpoint;
        }
        config.api_key = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        self.schema
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.engine.kind == EngineKind::Http && self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

/// A missing `.env` file is normal; any other failure is reported
fn check_env_file<T: std::fmt::Debug>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(loaded) => {
            debug!("Loaded environment file: {:?}", loaded);
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFile(e)),
    }
}
