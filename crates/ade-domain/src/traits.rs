//! Trait definitions for external interactions
//!
//! The extraction engine is a black box: bytes (and optionally a schema) in,
//! parsed documents out. Implementations live in `ade-engine`.

use crate::{DocumentSource, EngineError, ParseOptions, ParsedDocument};
use async_trait::async_trait;

/// Trait for document extraction engines
///
/// Implemented by the infrastructure layer (ade-engine)
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Parse a document, optionally extracting schema-described fields
    ///
    /// An empty result vector means the engine accepted the document but
    /// produced nothing; callers report that rather than treating it as an error.
    async fn parse(
        &self,
        source: DocumentSource,
        options: ParseOptions,
    ) -> Result<Vec<ParsedDocument>, EngineError>;

    /// Short engine name for logs
    fn name(&self) -> &str;
}
