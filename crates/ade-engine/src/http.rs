//! LandingAI ADE HTTP engine
//!
//! Uploads documents to the Agentic Document Extraction API and maps the
//! response onto the domain model.
//!
//! # Features
//!
//! - Multipart upload (`pdf` or `image` field picked from the file header)
//! - Optional `fields_schema` for schema-driven extraction
//! - Retry with exponential backoff on transport errors, 429 and 5xx
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use ade_engine::HttpEngine;
//!
//! let engine = HttpEngine::new("https://api.va.landing.ai", "my-api-key").unwrap();
//! ```

use crate::config::{EngineConfig, DEFAULT_ENDPOINT};
use ade_domain::{
    BoundingBox, Chunk, DocumentKind, DocumentSource, EngineError, ExtractionEngine, FieldMetadata, Grounding,
    ParseOptions, ParsedDocument,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// API path of the document analysis tool
const ANALYSIS_PATH: &str = "/v1/tools/agentic-document-analysis";

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default request timeout (10 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Engine backed by the ADE REST API
pub struct HttpEngine {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    backoff: Duration,
}

/// Response body of the analysis API
#[derive(Deserialize)]
struct AnalysisResponse {
    data: AnalysisData,
    #[serde(default)]
    extraction_error: Option<String>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Deserialize)]
struct AnalysisData {
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    chunks: Vec<WireChunk>,
    #[serde(default)]
    extracted_schema: Option<Value>,
    #[serde(default)]
    extraction_metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct WireChunk {
    text: String,
    chunk_type: String,
    chunk_id: String,
    #[serde(default)]
    grounding: Vec<WireGrounding>,
}

#[derive(Deserialize)]
struct WireGrounding {
    page: u32,
    #[serde(rename = "box")]
    bbox: BoundingBox,
}

impl HttpEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.va.landing.ai")
    /// - `api_key`: LandingAI API key
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, EngineError> {
        Self::build(
            endpoint.into(),
            api_key.into(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_RETRIES,
        )
    }

    /// Create an engine from configuration
    pub fn from_config(config: &EngineConfig, api_key: impl Into<String>) -> Result<Self, EngineError> {
        let endpoint = if config.endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            config.endpoint.clone()
        };
        Self::build(endpoint, api_key.into(), config.timeout(), config.max_retries)
    }

    fn build(endpoint: String, api_key: String, timeout: Duration, max_retries: u32) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
            max_retries: max_retries.max(1),
            backoff: Duration::from_secs(1),
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the initial backoff delay (doubled after each failed attempt)
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay before the attempt following `attempt`: base, 2x base, 4x base, ... capped
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    async fn load(source: &DocumentSource) -> Result<(Vec<u8>, Option<String>), EngineError> {
        match source {
            DocumentSource::Bytes(bytes) => Ok((bytes.clone(), None)),
            DocumentSource::Path(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Ok((bytes, Some(path.display().to_string()))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EngineError::FileNotFound(path.clone())),
                Err(e) => Err(EngineError::Io(e)),
            },
        }
    }

    fn form(bytes: &[u8], options: &ParseOptions) -> Form {
        let (field, file_name) = match DocumentKind::sniff(bytes) {
            DocumentKind::Pdf => ("pdf", "document.pdf"),
            DocumentKind::Image => ("image", "document"),
        };
        let mut form = Form::new().part(field, Part::bytes(bytes.to_vec()).file_name(file_name));
        if let Some(schema) = &options.extraction_schema {
            form = form.text("fields_schema", schema.to_string());
        }
        form
    }

    async fn send_once(&self, bytes: &[u8], options: &ParseOptions) -> Result<AnalysisResponse, EngineError> {
        let url = format!("{}{}", self.endpoint, ANALYSIS_PATH);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", self.api_key))
            .multipart(Self::form(bytes, options))
            .send()
            .await
            .map_err(|e| EngineError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<AnalysisResponse>()
                .await
                .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse response: {}", e)));
        }

        let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(EngineError::Unauthorized(message)),
            _ => Err(EngineError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

impl AnalysisResponse {
    fn into_document(self, source: Option<String>) -> ParsedDocument {
        for error in &self.errors {
            warn!("ADE reported a page error: {}", error);
        }

        let chunks = self
            .data
            .chunks
            .into_iter()
            .map(|chunk| Chunk {
                chunk_type: chunk.chunk_type,
                text: chunk.text,
                chunk_id: chunk.chunk_id,
                grounding: chunk
                    .grounding
                    .into_iter()
                    .map(|g| Grounding {
                        page: g.page,
                        bbox: g.bbox,
                    })
                    .collect(),
            })
            .collect();

        ParsedDocument {
            markdown: self.data.markdown,
            chunks,
            extraction: self.data.extracted_schema,
            extraction_metadata: field_metadata(self.data.extraction_metadata.unwrap_or_default()),
            extraction_error: self.extraction_error,
            source,
        }
    }
}

/// Keep entries that look like field metadata; nested or empty ones map to `None`
fn field_metadata(raw: Map<String, Value>) -> BTreeMap<String, Option<FieldMetadata>> {
    raw.into_iter()
        .map(|(field, value)| {
            let is_metadata = value
                .as_object()
                .map(|m| m.contains_key("confidence") || m.contains_key("raw_text") || m.contains_key("chunk_references"))
                .unwrap_or(false);
            let meta = if is_metadata {
                serde_json::from_value::<FieldMetadata>(value).ok()
            } else {
                None
            };
            (field, meta)
        })
        .collect()
}

#[async_trait]
impl ExtractionEngine for HttpEngine {
    async fn parse(
        &self,
        source: DocumentSource,
        options: ParseOptions,
    ) -> Result<Vec<ParsedDocument>, EngineError> {
        let (bytes, origin) = Self::load(&source).await?;
        debug!("Uploading {} bytes to {}", bytes.len(), self.endpoint);

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send_once(&bytes, &options).await {
                Ok(response) => return Ok(vec![response.into_document(origin)]),
                Err(e) if e.is_transient() && attempts < self.max_retries => {
                    let delay = self.backoff_delay(attempts);
                    warn!("ADE request failed (attempt {}/{}): {}; retrying in {:?}", attempts, self.max_retries, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        "ade-http"
    }
}
