//! Configuration for extraction engines

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default ADE API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.va.landing.ai";

/// Upper bound on attempts per request
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Which engine implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// LandingAI ADE over HTTP
    #[default]
    Http,
    /// Offline mock returning an empty document
    Mock,
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(EngineKind::Http),
            "mock" => Ok(EngineKind::Mock),
            other => Err(format!("unknown engine kind '{}' (expected 'http' or 'mock')", other)),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Http => write!(f, "http"),
            EngineKind::Mock => write!(f, "mock"),
        }
    }
}

/// Configuration for the extraction engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine implementation
    pub kind: EngineKind,

    /// Base URL of the ADE API
    pub endpoint: String,

    /// Maximum time for a single parse request (seconds)
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,
}

impl EngineConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.kind == EngineKind::Http && self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!("max_retries must be at most {}", MAX_RETRIES_LIMIT));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            // Multi-page documents routinely take minutes to analyse
            timeout_secs: 600,
            max_retries: 3,
        }
    }
}
