//! Raw extraction tools - chunks and markdown without a schema

use super::format::{PathExtraction, RawExtraction};
use super::{ToolOutput, NO_RESULTS};
use ade_domain::{DocumentSource, EngineError, ExtractionEngine, ParseOptions};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Parameters for ade_extract_raw_chunks
#[derive(Debug, Deserialize)]
pub struct ExtractRawParams {
    /// Base64-encoded PDF or image
    pub pdf_base64: String,
}

/// Parameters for ade_extract_from_path
#[derive(Debug, Deserialize)]
pub struct ExtractFromPathParams {
    /// Local file path
    pub path: String,
}

/// Handle ade_extract_raw_chunks tool invocation
///
/// Decodes the payload, parses it without a schema and returns the markdown
/// with every chunk and its grounding.
pub async fn handle_extract_raw_chunks(engine: &dyn ExtractionEngine, params: ExtractRawParams) -> ToolOutput {
    let result = match DocumentSource::from_base64(&params.pdf_base64) {
        Ok(source) => engine.parse(source, ParseOptions::default()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(docs) => match docs.first() {
            Some(doc) => {
                debug!("Raw extraction returned {} chunks", doc.chunks.len());
                ToolOutput::json(&RawExtraction::from(doc))
            }
            None => ToolOutput::error(NO_RESULTS),
        },
        Err(e) => {
            warn!("Raw extraction failed: {}", e);
            ToolOutput::error(format!("Error during raw extraction: {}", e))
        }
    }
}

/// Handle ade_extract_from_path tool invocation
///
/// Same output as raw extraction, wrapped with the file it came from.
pub async fn handle_extract_from_path(engine: &dyn ExtractionEngine, params: ExtractFromPathParams) -> ToolOutput {
    let path = PathBuf::from(&params.path);
    if !path.exists() {
        return ToolOutput::error(format!("❌ File not found: {}", params.path));
    }

    match engine.parse(DocumentSource::Path(path), ParseOptions::default()).await {
        Ok(docs) => match docs.first() {
            Some(doc) => ToolOutput::json(&PathExtraction {
                file_path: doc.source.clone().unwrap_or_else(|| params.path.clone()),
                extraction_result: RawExtraction::from(doc),
            }),
            None => ToolOutput::error(NO_RESULTS),
        },
        // The file can vanish between the check and the read
        Err(EngineError::FileNotFound(_)) => ToolOutput::error(format!("❌ File not found: {}", params.path)),
        Err(e) => {
            warn!("File path extraction failed for {}: {}", params.path, e);
            ToolOutput::error(format!("Error during file path extraction: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ade_domain::{BoundingBox, Chunk, Grounding, ParsedDocument};
    use ade_engine::MockEngine;
    use serde_json::Value;
    use std::io::Write;

    // "%PDF-1.4" in base64
    const PDF_B64: &str = "JVBERi0xLjQ=";

    fn receipt() -> ParsedDocument {
        ParsedDocument::new("# Receipt\n\nTotal: $12.00").with_chunk(Chunk {
            chunk_type: "text".to_string(),
            text: "Total: $12.00".to_string(),
            chunk_id: "c-7".to_string(),
            grounding: vec![Grounding {
                page: 1,
                bbox: BoundingBox { l: 0.1, t: 0.5, r: 0.6, b: 0.55 },
            }],
        })
    }

    #[tokio::test]
    async fn test_raw_chunks() {
        let engine = MockEngine::new(receipt());
        let output = handle_extract_raw_chunks(
            &engine,
            ExtractRawParams {
                pdf_base64: PDF_B64.to_string(),
            },
        )
        .await;

        assert!(!output.is_error);
        let value: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["markdown"], "# Receipt\n\nTotal: $12.00");
        assert_eq!(value["chunks"][0]["type"], "text");
        assert_eq!(value["chunks"][0]["page"], 1);
        assert_eq!(value["chunks"][0]["grounding"][0]["bbox"]["r"], 0.6);
        assert_eq!(engine.last_source(), Some(DocumentSource::Bytes(b"%PDF-1.4".to_vec())));
        assert_eq!(engine.last_options(), Some(ParseOptions::default()));
    }

    #[tokio::test]
    async fn test_raw_chunks_bad_base64_skips_engine() {
        let engine = MockEngine::new(receipt());
        let output = handle_extract_raw_chunks(
            &engine,
            ExtractRawParams {
                pdf_base64: "not base64!!".to_string(),
            },
        )
        .await;

        assert!(output.is_error);
        assert!(output.text.starts_with("Error during raw extraction: "));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_raw_chunks_no_results() {
        let engine = MockEngine::empty();
        let output = handle_extract_raw_chunks(
            &engine,
            ExtractRawParams {
                pdf_base64: PDF_B64.to_string(),
            },
        )
        .await;
        assert_eq!(output, ToolOutput::error("❌ No results returned"));
    }

    #[tokio::test]
    async fn test_raw_chunks_engine_failure() {
        let engine = MockEngine::failing("service unavailable");
        let output = handle_extract_raw_chunks(
            &engine,
            ExtractRawParams {
                pdf_base64: PDF_B64.to_string(),
            },
        )
        .await;
        assert_eq!(
            output.text,
            "Error during raw extraction: Communication error: service unavailable"
        );
    }

    #[tokio::test]
    async fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();
        let path = file.path().display().to_string();

        let engine = MockEngine::new(receipt());
        let output = handle_extract_from_path(&engine, ExtractFromPathParams { path: path.clone() }).await;

        assert!(!output.is_error);
        let value: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["file_path"], path.as_str());
        assert_eq!(value["extraction_result"]["chunks"][0]["chunk_id"], "c-7");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let engine = MockEngine::new(receipt());
        let output = handle_extract_from_path(
            &engine,
            ExtractFromPathParams {
                path: "/nonexistent/doc.pdf".to_string(),
            },
        )
        .await;

        assert_eq!(output, ToolOutput::error("❌ File not found: /nonexistent/doc.pdf"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_from_path_engine_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let engine = MockEngine::failing("timeout");
        let output = handle_extract_from_path(
            &engine,
            ExtractFromPathParams {
                path: file.path().display().to_string(),
            },
        )
        .await;
        assert_eq!(
            output.text,
            "Error during file path extraction: Communication error: timeout"
        );
    }
}
