//! Response payloads returned by the extraction tools

use ade_domain::{BoundingBox, Chunk, FieldMetadata, ParsedDocument};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw chunk extraction result
#[derive(Debug, Serialize)]
pub struct RawExtraction {
    /// Document rendered as markdown
    pub markdown: String,
    /// Chunks in reading order
    pub chunks: Vec<ChunkView>,
}

/// One chunk as shown to the client
#[derive(Debug, Serialize)]
pub struct ChunkView {
    /// Chunk type
    #[serde(rename = "type")]
    pub kind: String,
    /// Text content
    pub content: String,
    /// Page of the first grounding region
    pub page: Option<u32>,
    /// Engine-assigned identifier
    pub chunk_id: String,
    /// Every region the chunk spans
    pub grounding: Vec<GroundingView>,
}

/// Region on a page
#[derive(Debug, Serialize)]
pub struct GroundingView {
    /// Relative bounding box
    pub bbox: BoundingBox,
    /// Page index
    pub page: u32,
}

/// Result of extracting from a local file
#[derive(Debug, Serialize)]
pub struct PathExtraction {
    /// File the result belongs to
    pub file_path: String,
    /// Raw chunk extraction
    pub extraction_result: RawExtraction,
}

/// Schema-driven extraction result
#[derive(Debug, Serialize)]
pub struct SchemaExtraction {
    /// Error reported by the engine, if any
    pub extraction_error: Option<String>,
    /// Extracted values shaped by the schema
    pub extracted_data: Option<Value>,
    /// Confidence and provenance per field
    pub field_details: BTreeMap<String, FieldDetail>,
}

/// Metadata for one extracted field
#[derive(Debug, Serialize)]
pub struct FieldDetail {
    /// Confidence score
    pub confidence: Option<f64>,
    /// Source text
    pub raw_text: Option<String>,
    /// Chunks the value came from
    pub chunk_references: Vec<String>,
}

impl From<&Chunk> for ChunkView {
    fn from(chunk: &Chunk) -> Self {
        Self {
            kind: chunk.chunk_type.clone(),
            content: chunk.text.clone(),
            page: chunk.page(),
            chunk_id: chunk.chunk_id.clone(),
            grounding: chunk
                .grounding
                .iter()
                .map(|g| GroundingView {
                    bbox: g.bbox,
                    page: g.page,
                })
                .collect(),
        }
    }
}

impl From<&ParsedDocument> for RawExtraction {
    fn from(doc: &ParsedDocument) -> Self {
        Self {
            markdown: doc.markdown.clone(),
            chunks: doc.chunks.iter().map(ChunkView::from).collect(),
        }
    }
}

impl From<&FieldMetadata> for FieldDetail {
    fn from(meta: &FieldMetadata) -> Self {
        Self {
            confidence: meta.confidence,
            raw_text: meta.raw_text.clone(),
            chunk_references: meta.chunk_references.clone(),
        }
    }
}

impl From<&ParsedDocument> for SchemaExtraction {
    fn from(doc: &ParsedDocument) -> Self {
        Self {
            extraction_error: doc.extraction_error.clone(),
            extracted_data: doc.extraction.clone(),
            field_details: doc
                .field_details()
                .map(|(field, meta)| (field.to_string(), FieldDetail::from(meta)))
                .collect(),
        }
    }
}
