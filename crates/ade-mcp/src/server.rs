//! MCP server implementation

use ade_domain::ExtractionEngine;
use ade_engine::{EngineKind, HttpEngine, MockEngine};
use ade_schema::{SchemaRules, SchemaValidator};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, ServerConfig};
use crate::error::McpError;
use crate::protocol::*;
use crate::tools::{self, names};

/// MCP Server
///
/// Handles Model Context Protocol requests via stdio transport. Tool calls
/// that touch the extraction engine are driven to completion on an owned
/// tokio runtime, one request at a time.
pub struct McpServer {
    engine: Box<dyn ExtractionEngine>,
    validator: SchemaValidator,
    runtime: Runtime,
}

impl McpServer {
    /// Create a new MCP server
    ///
    /// # Arguments
    ///
    /// * `engine` - Extraction engine the tools delegate to
    /// * `rules` - Rules enforced before schema-driven extraction
    pub fn new(engine: Box<dyn ExtractionEngine>, rules: SchemaRules) -> Result<Self, McpError> {
        let runtime = Runtime::new()?;

        Ok(Self {
            engine,
            validator: SchemaValidator::new(rules),
            runtime,
        })
    }

    /// Build the engine described by `config` and wrap it in a server
    pub fn from_config(config: &ServerConfig) -> Result<Self, McpError> {
        let engine: Box<dyn ExtractionEngine> = match config.engine.kind {
            EngineKind::Http => {
                let api_key = config.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
                Box::new(HttpEngine::from_config(&config.engine, api_key)?)
            }
            EngineKind::Mock => {
                warn!("Using mock extraction engine; results are placeholders");
                Box::new(MockEngine::default())
            }
        };

        info!("Extraction engine: {}", engine.name());
        Self::new(engine, config.schema.clone())
    }

    /// Run the MCP server (stdio transport)
    ///
    /// Reads JSON-RPC requests from stdin and writes responses to stdout
    /// until stdin closes.
    pub fn run(&self) -> Result<(), McpError> {
        info!("MCP server started");

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        self.serve(BufReader::new(stdin.lock()), &mut stdout)?;

        info!("MCP server stopped");
        Ok(())
    }

    /// Serve newline-delimited requests from `reader`, one response line per request
    ///
    /// A line that is not valid UTF-8 is answered with a parse error and the
    /// session continues.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, writer: &mut W) -> Result<(), McpError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\r', '\n'])),
                Err(e) => {
                    error!("Request is not valid UTF-8: {}", e);
                    Some(JsonRpcError::new(None, -32700, format!("Parse error: {}", e)).into_value())
                }
            };

            if let Some(response) = response {
                self.write_response(writer, &response)?;
            }
        }
        Ok(())
    }

    /// Handle one raw request line
    ///
    /// Returns `None` for notifications, which never get a response.
    pub fn handle_line(&self, line: &str) -> Option<Value> {
        debug!("Received request: {}", line);

        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(JsonRpcError::new(None, -32700, format!("Parse error: {}", e)).into_value());
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = raw.get("id").cloned();
                let err = McpError::InvalidRequest(e.to_string());
                return Some(JsonRpcError::new(id, err.error_code(), err.to_string()).into_value());
            }
        };

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            let err = McpError::InvalidRequest(format!("unsupported jsonrpc version '{}'", request.jsonrpc));
            return Some(JsonRpcError::new(request.id, err.error_code(), err.to_string()).into_value());
        }

        Some(self.handle_request(request))
    }

    /// Handle a JSON-RPC request
    fn handle_request(&self, request: JsonRpcRequest) -> Value {
        let id = request.id;

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(request.params),
            "ping" => Ok(json!({})),
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(value) => JsonRpcResponse::new(id, value).into_value(),
            Err(e) => {
                warn!("Request failed: {}", e);
                JsonRpcError::new(id, e.error_code(), e.to_string()).into_value()
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Result<Value, McpError> {
        let response = InitializeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: "ade-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: Capabilities {
                tools: ToolsCapability { list_changed: false },
            },
        };
        Ok(serde_json::to_value(response)?)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let response = ToolListResponse {
            tools: tools::definitions(),
        };
        Ok(serde_json::to_value(response)?)
    }

    /// Handle tools/call request
    fn handle_tool_call(&self, params: Value) -> Result<Value, McpError> {
        let tool_name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("Missing tool name".to_string()))?;

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        info!("Tool call: {}", tool_name);

        let engine = self.engine.as_ref();
        let output = match tool_name {
            names::EXTRACT_RAW_CHUNKS => self
                .runtime
                .block_on(tools::handle_extract_raw_chunks(engine, parse_arguments(arguments)?)),
            names::EXTRACT_FROM_PATH => self
                .runtime
                .block_on(tools::handle_extract_from_path(engine, parse_arguments(arguments)?)),
            names::EXTRACT_WITH_MODEL => self.runtime.block_on(tools::handle_extract_with_model(
                engine,
                &self.validator,
                parse_arguments(arguments)?,
            )),
            names::VALIDATE_JSON_SCHEMA => {
                tools::handle_validate_json_schema(&self.validator, parse_arguments(arguments)?)
            }
            names::EXTRACT_WITH_JSON_SCHEMA => self.runtime.block_on(tools::handle_extract_with_json_schema(
                engine,
                &self.validator,
                parse_arguments(arguments)?,
            )),
            _ => return Err(McpError::ToolNotFound(tool_name.to_string())),
        };

        Ok(serde_json::to_value(output.into_result())?)
    }

    /// Write a single response line
    fn write_response<W: Write>(&self, writer: &mut W, response: &Value) -> Result<(), McpError> {
        let response_str = serde_json::to_string(response)?;
        writeln!(writer, "{}", response_str)?;
        writer.flush()?;
        debug!("Sent response: {}", response_str);
        Ok(())
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(Box::new(MockEngine::default()), SchemaRules::default()).unwrap()
    }

    #[test]
    fn test_notification_gets_no_response() {
        let response = server().handle_line(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#);
        assert!(response.is_none());
    }

    #[test]
    fn test_null_id_gets_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#)
            .unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": null, "result": {}}));
    }

    #[test]
    fn test_parse_error() {
        let response = server().handle_line("{not json").unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);
    }

    #[test]
    fn test_request_without_method_is_invalid() {
        let response = server().handle_line(r#"{"jsonrpc": "2.0", "id": 3}"#).unwrap();
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], 3);
    }

    #[test]
    fn test_wrong_jsonrpc_version() {
        let response = server()
            .handle_line(r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#)
            .unwrap();
        assert_eq!(response["error"]["code"], -32600);
    }

    #[test]
    fn test_ping() {
        let response = server()
            .handle_line(r#"{"jsonrpc": "2.0", "id": "p", "method": "ping"}"#)
            .unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "p", "result": {}}));
    }

    #[test]
    fn test_from_config_requires_key_for_http() {
        let config = ServerConfig::default();
        let result = McpServer::from_config(&config);
        assert!(matches!(result, Err(McpError::ConfigError(ConfigError::MissingApiKey))));
    }

    #[test]
    fn test_from_config_mock() {
        let mut config = ServerConfig::default();
        config.engine.kind = EngineKind::Mock;
        let server = McpServer::from_config(&config).unwrap();
        assert_eq!(server.engine.name(), "mock");
    }

    #[test]
    fn test_from_config_http() {
        let config = ServerConfig {
            api_key: Some("secret".to_string()),
            ..ServerConfig::default()
        };
        let server = McpServer::from_config(&config).unwrap();
        assert_eq!(server.engine.name(), "ade-http");
    }
}
