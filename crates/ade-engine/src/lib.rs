//! ADE Engine Layer
//!
//! Implementations of the `ExtractionEngine` trait from `ade-domain`.
//!
//! # Engines
//!
//! - `MockEngine`: Deterministic engine for tests and offline runs
//! - `HttpEngine`: LandingAI Agentic Document Extraction REST API
//!
//! # Examples
//!
//! ```
//! use ade_domain::{DocumentSource, ExtractionEngine, ParseOptions, ParsedDocument};
//! use ade_engine::MockEngine;
//!
//! let engine = MockEngine::new(ParsedDocument::new("# Hello"));
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let docs = runtime
//!     .block_on(engine.parse(DocumentSource::Bytes(b"%PDF".to_vec()), ParseOptions::default()))
//!     .unwrap();
//! assert_eq!(docs[0].markdown, "# Hello");
//! assert_eq!(engine.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod http;
pub mod mock;

pub use config::{EngineConfig, EngineKind};
pub use http::HttpEngine;
pub use mock::MockEngine;
