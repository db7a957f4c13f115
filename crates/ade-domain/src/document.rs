//! Parsed document model
//!
//! What the extraction engine hands back for one input document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Axis-aligned box on a page, in relative coordinates (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub l: f64,
    /// Top edge
    pub t: f64,
    /// Right edge
    pub r: f64,
    /// Bottom edge
    pub b: f64,
}

/// Location of a chunk on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grounding {
    /// Zero-based page index as reported by the engine
    pub page: u32,
    /// Region covered on that page
    pub bbox: BoundingBox,
}

/// A contiguous piece of document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Engine-defined chunk type (e.g. "text", "table", "figure", "marginalia")
    pub chunk_type: String,
    /// Text content of the chunk
    pub text: String,
    /// Engine-assigned chunk identifier
    pub chunk_id: String,
    /// Every region the chunk spans, possibly across pages
    #[serde(default)]
    pub grounding: Vec<Grounding>,
}

impl Chunk {
    /// Page of the first grounding region, if any
    pub fn page(&self) -> Option<u32> {
        self.grounding.first().map(|g| g.page)
    }
}

/// Confidence and provenance for a single extracted field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Confidence score (0.0 - 1.0)
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Text the value was read from
    #[serde(default)]
    pub raw_text: Option<String>,
    /// IDs of the chunks the value was found in
    #[serde(default)]
    pub chunk_references: Vec<String>,
}

/// Result of parsing one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Full document rendered as markdown
    pub markdown: String,

    /// Content chunks in reading order
    #[serde(default)]
    pub chunks: Vec<Chunk>,

    /// Schema-driven extraction, present only when a schema was supplied
    #[serde(default)]
    pub extraction: Option<Value>,

    /// Per-field metadata; `None` entries are fields the engine had no metadata for
    #[serde(default)]
    pub extraction_metadata: BTreeMap<String, Option<FieldMetadata>>,

    /// Engine-reported extraction error (parsing may still have succeeded)
    #[serde(default)]
    pub extraction_error: Option<String>,

    /// Where the document came from, when the engine knows
    #[serde(default)]
    pub source: Option<String>,
}

impl ParsedDocument {
    /// Create a document with markdown only
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Default::default()
        }
    }

    /// Add a chunk
    pub fn with_chunk(mut self, chunk: Chunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    /// Set the extracted data
    pub fn with_extraction(mut self, extraction: Value) -> Self {
        self.extraction = Some(extraction);
        self
    }

    /// Attach metadata for one field
    pub fn with_field_metadata(mut self, field: impl Into<String>, meta: Option<FieldMetadata>) -> Self {
        self.extraction_metadata.insert(field.into(), meta);
        self
    }

    /// Fields that carry metadata, skipping those the engine left empty
    pub fn field_details(&self) -> impl Iterator<Item = (&str, &FieldMetadata)> {
        self.extraction_metadata
            .iter()
            .filter_map(|(field, meta)| meta.as_ref().map(|m| (field.as_str(), m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(id: &str, pages: &[u32]) -> Chunk {
        Chunk {
            chunk_type: "text".to_string(),
            text: format!("content of {}", id),
            chunk_id: id.to_string(),
            grounding: pages
                .iter()
                .map(|&page| Grounding { page, bbox: BoundingBox::default() })
                .collect(),
        }
    }

    #[test]
    fn test_chunk_page_is_first_grounding() {
        assert_eq!(chunk("c1", &[2, 3]).page(), Some(2));
        assert_eq!(chunk("c2", &[]).page(), None);
    }

    #[test]
    fn test_field_details_skip_missing_metadata() {
        let doc = ParsedDocument::new("# Invoice")
            .with_extraction(json!({"total": 12.5, "vendor": "Acme"}))
            .with_field_metadata(
                "total",
                Some(FieldMetadata {
                    confidence: Some(0.97),
                    raw_text: Some("$12.50".to_string()),
                    chunk_references: vec!["c1".to_string()],
                }),
            )
            .with_field_metadata("vendor", None);

        let details: Vec<_> = doc.field_details().collect();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].0, "total");
        assert_eq!(details[0].1.confidence, Some(0.97));
    }

    #[test]
    fn test_parsed_document_deserialize_defaults() {
        let doc: ParsedDocument = serde_json::from_value(json!({"markdown": "hello"})).unwrap();
        assert_eq!(doc.markdown, "hello");
        assert!(doc.chunks.is_empty());
        assert!(doc.extraction.is_none());
        assert!(doc.extraction_metadata.is_empty());
    }
}
