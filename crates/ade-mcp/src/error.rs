//! Error types for MCP server operations.

use crate::config::ConfigError;
use ade_domain::EngineError;
use thiserror::Error;

/// MCP server error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Invalid request format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown JSON-RPC method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Missing or malformed tool arguments
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Extraction engine could not be set up
    #[error("Engine error: {0}")]
    EngineError(#[from] EngineError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::ToolNotFound(_) => -32602,
            McpError::JsonError(_) => -32700,
            McpError::EngineError(_) | McpError::ConfigError(_) | McpError::IoError(_) => -32000,
        }
    }
}
