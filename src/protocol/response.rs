use serde::{Deserialize, Serialize};

use super::request::RpcId;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Always serialized; `null` when the request id could not be recovered.
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Unknown tool: {name}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_response_omits_error() {
        let resp = JsonRpcResponse::success(Some(RpcId::Number(1)), json!({"ok": true}));
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("\"jsonrpc\":\"2.0\""));
        assert!(out.contains("\"result\""));
        assert!(!out.contains("\"error\""));
    }

    #[test]
    fn error_response_omits_result() {
        let resp = JsonRpcResponse::error(
            Some(RpcId::Str("abc-123".into())),
            JsonRpcError::method_not_found("bogus"),
        );
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains("-32601"));
        assert!(out.contains("abc-123"));
        assert!(!out.contains("\"result\""));
    }

    #[test]
    fn response_round_trips() {
        let resp = JsonRpcResponse::success(
            Some(RpcId::Number(7)),
            serde_json::to_value(ToolResult::text("flowchart LR\n")).unwrap(),
        );
        let line = serde_json::to_string(&resp).unwrap();
        assert!(!line.contains('\n'), "serialized message must be single-line");

        let back: JsonRpcResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(back.id, Some(RpcId::Number(7)));
        let result: ToolResult = serde_json::from_value(back.result.unwrap()).unwrap();
        assert_eq!(result.content[0].text, "flowchart LR\n");
        assert!(!result.is_error);
    }

    #[test]
    fn error_code_constructors() {
        assert_eq!(JsonRpcError::parse_error().code, -32700);
        assert_eq!(JsonRpcError::invalid_request().code, -32600);
        assert_eq!(JsonRpcError::method_not_found("x").code, -32601);
        assert_eq!(JsonRpcError::unknown_tool("x").code, -32601);
        assert_eq!(JsonRpcError::invalid_params("x").code, -32602);
        assert_eq!(JsonRpcError::internal_error("x").code, -32603);
    }
}
