//! Mock extraction engine
//!
//! Returns pre-configured documents without any network calls. Clones share
//! their call log, so a test can hand one clone to the server and inspect
//! the other.

use ade_domain::{DocumentSource, EngineError, ExtractionEngine, ParseOptions, ParsedDocument};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone)]
enum MockResponse {
    Documents(Vec<ParsedDocument>),
    Failure(String),
}

#[derive(Debug, Default)]
struct CallLog {
    count: usize,
    last_options: Option<ParseOptions>,
    last_source: Option<DocumentSource>,
}

/// Deterministic engine for tests and offline runs
///
/// # Examples
///
/// ```
/// use ade_domain::ParsedDocument;
/// use ade_engine::MockEngine;
///
/// let engine = MockEngine::new(ParsedDocument::new("# Title"));
/// assert_eq!(engine.call_count(), 0);
///
/// let failing = MockEngine::failing("service unavailable");
/// assert_eq!(failing.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockEngine {
    response: MockResponse,
    log: Arc<Mutex<CallLog>>,
}

impl MockEngine {
    /// Engine that returns a single document for every call
    pub fn new(document: ParsedDocument) -> Self {
        Self::with_documents(vec![document])
    }

    /// Engine that returns the given documents for every call
    pub fn with_documents(documents: Vec<ParsedDocument>) -> Self {
        Self {
            response: MockResponse::Documents(documents),
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Engine that accepts documents but returns no results
    pub fn empty() -> Self {
        Self::with_documents(Vec::new())
    }

    /// Engine that fails every call with a communication error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: MockResponse::Failure(message.into()),
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Number of times `parse` was called
    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    /// Options passed to the most recent `parse` call
    pub fn last_options(&self) -> Option<ParseOptions> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_options
            .clone()
    }

    /// Source passed to the most recent `parse` call
    pub fn last_source(&self) -> Option<DocumentSource> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_source
            .clone()
    }

    /// Reset the call log
    pub fn reset(&self) {
        *self.log.lock().unwrap_or_else(PoisonError::into_inner) = CallLog::default();
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new(ParsedDocument::default())
    }
}

#[async_trait]
impl ExtractionEngine for MockEngine {
    async fn parse(
        &self,
        source: DocumentSource,
        options: ParseOptions,
    ) -> Result<Vec<ParsedDocument>, EngineError> {
        debug!("Mock parse of {}", source.describe());
        {
            let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
            log.count += 1;
            log.last_options = Some(options);
            log.last_source = Some(source.clone());
        }

        if let DocumentSource::Path(path) = &source {
            if !path.exists() {
                return Err(EngineError::FileNotFound(path.clone()));
            }
        }

        match &self.response {
            MockResponse::Failure(message) => Err(EngineError::Communication(message.clone())),
            MockResponse::Documents(documents) => Ok(documents
                .iter()
                .cloned()
                .map(|mut doc| {
                    if let DocumentSource::Path(path) = &source {
                        doc.source.get_or_insert_with(|| path.display().to_string());
                    }
                    doc
                })
                .collect()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn pdf() -> DocumentSource {
        DocumentSource::Bytes(b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn test_returns_configured_document() {
        let engine = MockEngine::new(ParsedDocument::new("# Title"));
        let docs = engine.parse(pdf(), ParseOptions::default()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].markdown, "# Title");
    }

    #[tokio::test]
    async fn test_empty_engine() {
        let engine = MockEngine::empty();
        let docs = engine.parse(pdf(), ParseOptions::default()).await.unwrap();
        assert!(docs.is_empty());
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_engine() {
        let engine = MockEngine::failing("down");
        let result = engine.parse(pdf(), ParseOptions::default()).await;
        assert!(matches!(result, Err(EngineError::Communication(m)) if m == "down"));
    }

    #[tokio::test]
    async fn test_records_options_and_shares_log_across_clones() {
        let engine = MockEngine::default();
        let observer = engine.clone();

        let schema = json!({"type": "object", "properties": {}});
        engine.parse(pdf(), ParseOptions::with_schema(schema.clone())).await.unwrap();

        assert_eq!(observer.call_count(), 1);
        assert_eq!(observer.last_options().unwrap().extraction_schema, Some(schema));
        assert_eq!(observer.last_source(), Some(pdf()));

        observer.reset();
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let engine = MockEngine::default();
        let missing = PathBuf::from("/definitely/not/here.pdf");
        let result = engine.parse(DocumentSource::Path(missing.clone()), ParseOptions::default()).await;
        assert!(matches!(result, Err(EngineError::FileNotFound(p)) if p == missing));
    }

    #[tokio::test]
    async fn test_path_sets_source() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let engine = MockEngine::default();
        let docs = engine
            .parse(DocumentSource::Path(file.path().to_path_buf()), ParseOptions::default())
            .await
            .unwrap();
        assert_eq!(docs[0].source.as_deref(), Some(file.path().display().to_string().as_str()));
    }
}
