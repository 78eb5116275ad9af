//! MCP (Model Context Protocol) server implementation.
//!
//! Implements the MCP JSON-RPC 2.0 protocol, exposing every registered
//! adapter's tools.  Supports the `initialize`, `tools/list`, `tools/call`
//! and `ping` methods.  Requests without an `id` are notifications and get
//! no response.
//!
//! The MCP protocol revision targeted is `2024-11-05`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use vonage_mcp_adapters::{Adapter, ToolOutput};

// ---------------------------------------------------------------------------
// MCP protocol version
// ---------------------------------------------------------------------------

/// The MCP protocol version this server implements.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// The server name reported during initialization.
pub const SERVER_NAME: &str = "vonage-mcp-server-api-bindings";

/// The server version reported during initialization.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// JSON-RPC types
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    /// Request identifier.  Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// The method to invoke.
    pub method: String,
    /// Method parameters (defaults to `null` if absent).
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Whether the sender expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Echoed from the request.
    pub id: Option<Value>,
    /// Present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code (negative numbers are reserved by JSON-RPC).
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
}

// Standard JSON-RPC error codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

impl JsonRpcResponse {
    /// Construct a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Construct an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MCP-specific types
// ---------------------------------------------------------------------------

/// An MCP tool definition returned by `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    /// The machine-readable tool name.
    pub name: String,
    /// Short display title.
    pub title: String,
    /// Human-readable description of the tool.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The result of an MCP `tools/call` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolResult {
    /// The content blocks returned by the tool.
    pub content: Vec<McpContent>,
    /// Whether the tool call resulted in an error.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// A single content block within an MCP tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpContent {
    /// The content type (always `"text"` here).
    #[serde(rename = "type")]
    pub content_type: String,
    /// The textual content.
    pub text: String,
}

impl McpContent {
    /// Create a text content block.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            content_type: "text".into(),
            text: value.into(),
        }
    }
}

impl McpToolResult {
    /// Create a successful tool result with a single text block.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: None,
        }
    }

    /// Create an error tool result with a single text block.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: Some(true),
        }
    }
}

impl From<ToolOutput> for McpToolResult {
    fn from(output: ToolOutput) -> Self {
        if output.is_error {
            Self::error(output.text)
        } else {
            Self::success(output.text)
        }
    }
}

// ---------------------------------------------------------------------------
// McpServer
// ---------------------------------------------------------------------------

/// MCP protocol server that exposes adapters as tools.
pub struct McpServer {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl McpServer {
    /// Create a new MCP server backed by the given adapters.
    pub fn new(adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    /// The adapters this server exposes.
    pub fn adapters(&self) -> &[Arc<dyn Adapter>] {
        &self.adapters
    }

    /// Handle one raw message: a single request or a batch.
    ///
    /// Returns the JSON to send back, or `None` when nothing should be sent
    /// (a notification, or a batch made only of notifications).
    pub async fn handle_message(&self, raw: &str) -> Option<Value> {
        let message: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparsable MCP message");
                return Some(json!(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("failed to parse JSON-RPC request: {e}"),
                )));
            }
        };

        match message {
            Value::Array(batch) => {
                if batch.is_empty() {
                    return Some(json!(JsonRpcResponse::error(
                        None,
                        INVALID_REQUEST,
                        "empty batch request",
                    )));
                }
                let mut responses = Vec::with_capacity(batch.len());
                for item in batch {
                    if let Some(resp) = self.handle_value(item).await {
                        responses.push(resp);
                    }
                }
                if responses.is_empty() {
                    None
                } else {
                    Some(json!(responses))
                }
            }
            single => self.handle_value(single).await.map(|resp| json!(resp)),
        }
    }

    async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value.get("id").cloned().filter(|id| !id.is_null());
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.is_notification() => {
                self.handle_notification(&request);
                None
            }
            Ok(request) => Some(self.handle_request(request).await),
            Err(e) => Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("invalid JSON-RPC request: {e}"),
            )),
        }
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        tracing::debug!(method = %request.method, "MCP notification received");
    }

    /// Handle a single JSON-RPC request and return a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "MCP request received");

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                format!("unsupported jsonrpc version: {}", request.jsonrpc),
            );
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            other => {
                tracing::warn!(method = %other, "unknown MCP method");
                JsonRpcResponse::error(
                    request.id,
                    METHOD_NOT_FOUND,
                    format!("method not found: {other}"),
                )
            }
        }
    }

    /// Handle the `initialize` handshake.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    /// Handle `tools/list` by collecting tool definitions from all adapters.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        match serde_json::to_value(self.list_tools()) {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize tool list");
                JsonRpcResponse::error(id, INTERNAL_ERROR, "failed to serialize tool list")
            }
        }
    }

    /// Handle `tools/call` by dispatching to the appropriate adapter.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                "missing required field `name` in params",
            );
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .filter(|a| !a.is_null())
            .unwrap_or_else(|| json!({}));

        let result = self.call_tool(name, arguments).await;
        match serde_json::to_value(&result) {
            Ok(v) => JsonRpcResponse::success(id, v),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize tool result");
                JsonRpcResponse::error(id, INTERNAL_ERROR, "failed to serialize tool result")
            }
        }
    }

    /// Build the tool list from all adapters.
    pub fn list_tools(&self) -> Vec<McpToolDefinition> {
        self.adapters
            .iter()
            .flat_map(|adapter| {
                adapter.tools().into_iter().map(|t| McpToolDefinition {
                    name: t.name,
                    title: t.title,
                    description: t.description,
                    input_schema: t.parameters,
                })
            })
            .collect()
    }

    /// Execute a tool call by finding the adapter that owns the tool.
    ///
    /// Every failure becomes an `isError` result so the session survives it.
    async fn call_tool(&self, name: &str, arguments: Value) -> McpToolResult {
        let Some(adapter) = self
            .adapters
            .iter()
            .find(|a| a.tools().iter().any(|t| t.name == name))
        else {
            tracing::warn!(tool = name, "unknown tool requested");
            return McpToolResult::error(format!("unknown tool: {name}"));
        };

        match adapter.execute_tool(name, arguments).await {
            Ok(output) => {
                tracing::info!(tool = name, is_error = output.is_error, "tool call completed");
                output.into()
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call rejected");
                McpToolResult::error(format!("tool execution failed: {e}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vonage_mcp_adapters::{AdapterError, AdapterType, HealthStatus, ToolDefinition};

    // -- Mock adapter for testing ------------------------------------------------

    struct MockAdapter {
        id: String,
        tool_defs: Vec<ToolDefinition>,
    }

    impl MockAdapter {
        fn new(id: &str, tools: Vec<ToolDefinition>) -> Self {
            Self {
                id: id.to_owned(),
                tool_defs: tools,
            }
        }
    }

    #[async_trait]
    impl Adapter for MockAdapter {
        fn id(&self) -> &str {
            &self.id
        }

        fn adapter_type(&self) -> AdapterType {
            AdapterType::Account
        }

        async fn health_check(&self) -> vonage_mcp_adapters::Result<HealthStatus> {
            Ok(HealthStatus::Healthy)
        }

        fn tools(&self) -> Vec<ToolDefinition> {
            self.tool_defs.clone()
        }

        async fn execute_tool(
            &self,
            name: &str,
            params: Value,
        ) -> vonage_mcp_adapters::Result<ToolOutput> {
            match name {
                "mock_echo" => Ok(ToolOutput::text(format!("echo {params}"))),
                "mock_fail" => Ok(ToolOutput::error("Error doing mock work: boom")),
                "mock_strict" => Err(AdapterError::InvalidParams {
                    tool_name: name.to_owned(),
                    reason: "missing required string field `to`".into(),
                }),
                _ => Err(AdapterError::ToolNotFound {
                    adapter_id: self.id.clone(),
                    tool_name: name.to_owned(),
                }),
            }
        }
    }

    fn mock_tool(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_owned(),
            title: name.to_uppercase(),
            description: description.to_owned(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "input": { "type": "string" }
                },
                "required": ["input"]
            }),
        }
    }

    fn mock_adapters() -> Vec<Arc<dyn Adapter>> {
        vec![
            Arc::new(MockAdapter::new(
                "mock1",
                vec![
                    mock_tool("mock_echo", "Echoes input back"),
                    mock_tool("mock_fail", "Always fails"),
                ],
            )),
            Arc::new(MockAdapter::new(
                "mock2",
                vec![mock_tool("mock_strict", "Rejects its arguments")],
            )),
        ]
    }

    fn make_request(id: Value, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    // -- Wire types --------------------------------------------------------------

    #[test]
    fn request_parsing_without_params_or_id() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(req.params.is_null());
        assert!(req.is_notification());
    }

    #[test]
    fn response_serialization_omits_absent_members() {
        let ok = serde_json::to_value(JsonRpcResponse::success(Some(json!(1)), json!({}))).unwrap();
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(JsonRpcResponse::error(
            Some(json!(2)),
            METHOD_NOT_FOUND,
            "not found",
        ))
        .unwrap();
        assert!(err.get("result").is_none());
        assert_eq!(err["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn tool_output_maps_to_is_error() {
        let ok: McpToolResult = ToolOutput::text("done").into();
        assert!(ok.is_error.is_none());
        let failed: McpToolResult = ToolOutput::error("Error getting balance: x").into();
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(failed.content[0].text, "Error getting balance: x");
    }

    // -- Methods -----------------------------------------------------------------

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let server = McpServer::new(vec![]);
        let resp = server
            .handle_request(make_request(json!(1), "initialize", json!({})))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "vonage-mcp-server-api-bindings");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn ping_returns_empty_object() {
        let server = McpServer::new(vec![]);
        let resp = server.handle_request(make_request(json!(42), "ping", json!(null))).await;
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn tools_list_includes_title_and_schema() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(json!(3), "tools/list", json!(null)))
            .await;
        let result = resp.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "mock_echo");
        assert_eq!(tools[0]["title"], "MOCK_ECHO");
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn tools_call_success_has_no_is_error() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(
                json!(5),
                "tools/call",
                json!({ "name": "mock_echo", "arguments": { "input": "hello" } }),
            ))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert!(result["content"][0]["text"].as_str().unwrap().contains("hello"));
        assert!(result.get("isError").is_none());
    }

    #[tokio::test]
    async fn tools_call_failure_output_is_flagged() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(json!(6), "tools/call", json!({ "name": "mock_fail" })))
            .await;
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Error doing mock work: boom");
    }

    #[tokio::test]
    async fn tools_call_rejected_arguments_are_flagged() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(
                json!(7),
                "tools/call",
                json!({ "name": "mock_strict", "arguments": {} }),
            ))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(
            result["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("tool execution failed: invalid parameters")
        );
    }

    #[tokio::test]
    async fn tools_call_unknown_tool() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(
                json!(8),
                "tools/call",
                json!({ "name": "nonexistent_tool" }),
            ))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "unknown tool: nonexistent_tool");
    }

    #[tokio::test]
    async fn tools_call_missing_name_is_invalid_params() {
        let server = McpServer::new(mock_adapters());
        let resp = server
            .handle_request(make_request(json!(9), "tools/call", json!({ "arguments": {} })))
            .await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_method_returns_error() {
        let server = McpServer::new(vec![]);
        let resp = server
            .handle_request(make_request(json!(10), "resources/list", json!(null)))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert!(err.message.contains("resources/list"));
    }

    #[tokio::test]
    async fn wrong_jsonrpc_version_is_invalid_request() {
        let server = McpServer::new(vec![]);
        let mut req = make_request(json!(11), "ping", json!(null));
        req.jsonrpc = "1.0".into();
        let resp = server.handle_request(req).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    // -- Raw messages ------------------------------------------------------------

    #[tokio::test]
    async fn notification_gets_no_response() {
        let server = McpServer::new(vec![]);
        let out = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn unparsable_message_is_parse_error() {
        let server = McpServer::new(vec![]);
        let out = server.handle_message("not valid json!!!").await.unwrap();
        assert_eq!(out["error"]["code"], PARSE_ERROR);
        assert!(out["id"].is_null());
    }

    #[tokio::test]
    async fn malformed_request_echoes_id() {
        let server = McpServer::new(vec![]);
        let out = server.handle_message(r#"{"id":4,"params":{}}"#).await.unwrap();
        assert_eq!(out["error"]["code"], INVALID_REQUEST);
        assert_eq!(out["id"], 4);
    }

    #[tokio::test]
    async fn batch_answers_requests_and_skips_notifications() {
        let server = McpServer::new(mock_adapters());
        let out = server
            .handle_message(
                r#"[
                    {"jsonrpc":"2.0","id":1,"method":"ping"},
                    {"jsonrpc":"2.0","method":"notifications/initialized"},
                    {"jsonrpc":"2.0","id":2,"method":"nonexistent"}
                ]"#,
            )
            .await
            .unwrap();

        let responses = out.as_array().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert!(responses[0].get("error").is_none());
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_batch_is_invalid_request() {
        let server = McpServer::new(vec![]);
        let out = server.handle_message("[]").await.unwrap();
        assert_eq!(out["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn notification_only_batch_gets_no_response() {
        let server = McpServer::new(vec![]);
        let out = server
            .handle_message(r#"[{"jsonrpc":"2.0","method":"notifications/cancelled"}]"#)
            .await;
        assert!(out.is_none());
    }
}
