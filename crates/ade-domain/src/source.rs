//! Document inputs and parse options

use crate::EngineError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::path::PathBuf;

/// Where the document bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// Raw document bytes (PDF or image)
    Bytes(Vec<u8>),
    /// A file on the local filesystem, read by the engine
    Path(PathBuf),
}

impl DocumentSource {
    /// Decode a base64 document payload
    ///
    /// Whitespace and a leading `data:<mime>;base64,` prefix are tolerated,
    /// since clients frequently wrap long payloads or paste data URLs.
    pub fn from_base64(encoded: &str) -> Result<Self, EngineError> {
        let payload = match encoded.find(";base64,") {
            Some(idx) if encoded.starts_with("data:") => &encoded[idx + ";base64,".len()..],
            _ => encoded,
        };
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(EngineError::Decode("document is empty".to_string()));
        }
        Ok(DocumentSource::Bytes(bytes))
    }

    /// Human-readable label for logs
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Bytes(bytes) => format!("{} bytes", bytes.len()),
            DocumentSource::Path(path) => path.display().to_string(),
        }
    }
}

/// Broad document family, used to pick the upload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF document
    Pdf,
    /// Anything else is sent as an image
    Image,
}

impl DocumentKind {
    /// Sniff the document family from its leading bytes
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        }
    }
}

/// What to extract besides raw chunks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    /// JSON Schema describing the fields to extract
    pub extraction_schema: Option<Value>,
}

impl ParseOptions {
    /// Options for schema-driven extraction
    pub fn with_schema(schema: Value) -> Self {
        Self {
            extraction_schema: Some(schema),
        }
    }
}
