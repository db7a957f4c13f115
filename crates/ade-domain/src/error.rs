//! Error types for extraction engine operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while handing a document to the extraction engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Document payload could not be decoded
    #[error("Invalid document encoding: {0}")]
    Decode(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// API key rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Engine answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Engine answered with something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Communication(_) => true,
            EngineError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(EngineError::Communication("reset".into()).is_transient());
        assert!(EngineError::Api { status: 503, message: "busy".into() }.is_transient());
        assert!(EngineError::Api { status: 429, message: "slow down".into() }.is_transient());
        assert!(!EngineError::Api { status: 422, message: "bad schema".into() }.is_transient());
        assert!(!EngineError::Unauthorized("bad key".into()).is_transient());
        assert!(!EngineError::FileNotFound(PathBuf::from("x.pdf")).is_transient());
    }

    #[test]
    fn test_display() {
        let err = EngineError::FileNotFound(PathBuf::from("/tmp/missing.pdf"));
        assert_eq!(err.to_string(), "File not found: /tmp/missing.pdf");

        let err = EngineError::Api { status: 500, message: "boom".into() };
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }
}
