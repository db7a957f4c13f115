//! MCP protocol types (JSON-RPC 2.0)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID; `None` only when the member is absent (notification).
    /// An explicit `"id": null` is kept as `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// Notifications carry no id and expect no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response (success)
#[derive(Debug)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    pub id: Option<Value>,
    /// Result data
    pub result: Value,
}

/// JSON-RPC error response
#[derive(Debug)]
pub struct JsonRpcError {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    pub id: Option<Value>,
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug)]
pub struct ErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn new(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
        }
    }

    /// Wire representation
    pub fn into_value(self) -> Value {
        json!({
            "jsonrpc": self.jsonrpc,
            "id": self.id,
            "result": self.result,
        })
    }
}

impl JsonRpcError {
    /// Create a new error response
    pub fn new(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            error: ErrorDetail { code, message },
        }
    }

    /// Wire representation
    pub fn into_value(self) -> Value {
        json!({
            "jsonrpc": self.jsonrpc,
            "id": self.id,
            "error": {
                "code": self.error.code,
                "message": self.error.message,
            },
        })
    }
}

/// MCP tool list response
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    /// Available tools
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition
#[derive(Debug, Serialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Content block of a tool result
#[derive(Debug, Serialize)]
pub struct Content {
    /// Content type (always "text" here)
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload
    pub text: String,
}

/// Result of a tools/call request
#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    /// Content blocks
    pub content: Vec<Content>,
    /// Whether the tool reported a failure
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Single text block result
    pub fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![Content {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }
}

/// MCP server info
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Initialize response
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Capabilities
    pub capabilities: Capabilities,
}

/// Server capabilities
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tools capability
    pub tools: ToolsCapability,
}

/// Tools capability
#[derive(Debug, Serialize)]
pub struct ToolsCapability {
    /// Whether the tool list can change during a session
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}
