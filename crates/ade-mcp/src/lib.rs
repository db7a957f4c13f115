//! ADE MCP Server
//!
//! Model Context Protocol server exposing LandingAI Agentic Document
//! Extraction to AI clients (Claude Desktop, Cline, etc.).
//!
//! Provides 5 MCP tools:
//! - `ade_extract_raw_chunks` - Chunks and markdown from a base64 document
//! - `ade_extract_from_path` - Chunks and markdown from a local file
//! - `ade_extract_with_model` - Extraction driven by a declarative model
//! - `ade_validate_json_schema` - Check a schema against ADE rules
//! - `ade_extract_with_json_schema` - Extraction driven by a JSON Schema
//!
//! # Example
//!
//! ```no_run
//! use ade_mcp::{McpServer, ServerConfig};
//!
//! let config = ServerConfig::load().unwrap();
//! let server = McpServer::from_config(&config).unwrap();
//! server.run().unwrap();
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod protocol;
mod server;
pub mod tools;

pub use config::{ConfigError, ServerConfig};
pub use error::McpError;
pub use server::McpServer;
