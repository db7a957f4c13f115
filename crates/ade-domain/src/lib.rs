//! ADE Domain Layer
//!
//! Shared vocabulary for the ADE MCP adapter: the parsed-document model
//! returned by the extraction engine, the description of what to parse,
//! and the trait boundary behind which the engine lives.
//!
//! ## Key Concepts
//!
//! - **ParsedDocument**: Markdown, chunks, and (optionally) schema-driven extraction
//! - **Chunk**: A region of text with its type and page grounding
//! - **FieldMetadata**: Per-field confidence and provenance for extracted values
//! - **ExtractionEngine**: The external collaborator that turns bytes into documents
//!
//! ## Architecture
//!
//! Engine implementations (HTTP, mock) live in `ade-engine`; the MCP server in
//! `ade-mcp` only ever sees the trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use document::{BoundingBox, Chunk, FieldMetadata, Grounding, ParsedDocument};
pub use error::EngineError;
pub use source::{DocumentKind, DocumentSource, ParseOptions};
pub use traits::ExtractionEngine;
