pub mod call_hierarchy;
pub mod callgraph;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::protocol::{
    CallHierarchyArgs, CallgraphArgs, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ToolCallParams,
};
use crate::schema;

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, config: &ServerConfig) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let result = json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "callgraph-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), json!({}))),

        "tools/list" => {
            let result = json!({
                "tools": [
                    {
                        "name": "callgraph",
                        "description": "Generate a Mermaid call graph for Go packages",
                        "inputSchema": callgraph_schema()
                    },
                    {
                        "name": "callHierarchy",
                        "description": "Trace callers or callees of a symbol as a Mermaid diagram",
                        "inputSchema": call_hierarchy_schema()
                    }
                ]
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}")),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let response = match dispatch_tool_call(&params, config).await {
                Ok(tool_result) => {
                    let result_json = serde_json::to_value(&tool_result)
                        .expect("ToolResult must serialize to JSON Value");
                    JsonRpcResponse::success(req.id.clone(), result_json)
                }
                Err(error) => JsonRpcResponse::error(req.id.clone(), error),
            };
            Some(response)
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

async fn dispatch_tool_call(
    params: &ToolCallParams,
    config: &ServerConfig,
) -> Result<crate::protocol::ToolResult, JsonRpcError> {
    match params.name.as_str() {
        "callgraph" => {
            let args: CallgraphArgs =
                parse_tool_args("callgraph", &callgraph_schema(), params.arguments.as_ref())?;
            callgraph::handle(args, config).await
        }
        "callHierarchy" => {
            let args: CallHierarchyArgs = parse_tool_args(
                "callHierarchy",
                &call_hierarchy_schema(),
                params.arguments.as_ref(),
            )?;
            call_hierarchy::handle(args, config).await
        }
        other => Err(JsonRpcError::unknown_tool(other)),
    }
}

/// Validate tool arguments against the advertised input schema, then
/// deserialize them. Violations surface as `Invalid params` (-32602).
fn parse_tool_args<T: DeserializeOwned>(
    tool: &str,
    schema_value: &Value,
    arguments: Option<&Value>,
) -> Result<T, JsonRpcError> {
    let args = arguments.cloned().unwrap_or_else(|| json!({}));
    schema::validate_json(schema_value, &args).map_err(|e| {
        JsonRpcError::invalid_params(format!("Invalid arguments for {tool}: {e}"))
    })?;
    serde_json::from_value(args).map_err(|e| {
        JsonRpcError::invalid_params(format!("Invalid arguments for {tool}: {e}"))
    })
}

/// Input schema for the `callgraph` tool; also used to validate `tools/call`
/// arguments so the advertised and accepted shapes cannot drift apart.
fn callgraph_schema() -> Value {
    let mut schema = base_schema();
    schema["required"] = json!(["moduleArgs"]);
    schema
}

/// Input schema for `callHierarchy`: the callgraph surface plus the start
/// symbol and traversal direction.
fn call_hierarchy_schema() -> Value {
    let mut schema = base_schema();
    schema["required"] = json!(["moduleArgs"]);
    let props = schema["properties"].as_object_mut().expect("base schema has properties");
    props.insert(
        "symbol".to_string(),
        json!({
            "type": "string",
            "description": "Start symbol (e.g. 'main.main'); defaults to the program entry points"
        }),
    );
    props.insert(
        "direction".to_string(),
        json!({
            "type": "string",
            "enum": ["downstream", "upstream", "both"],
            "description": "Traversal direction from the start symbol"
        }),
    );
    schema
}

fn base_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "moduleArgs": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "description": "Package/module directories to analyze (e.g. ['./...'])"
            },
            "dir": {
                "type": "string",
                "description": "Working directory the module arguments are resolved against"
            },
            "focus": {
                "type": "string",
                "description": "Focus a specific package by name or import path"
            },
            "group": {
                "type": "array",
                "items": { "type": "string", "enum": ["pkg", "type"] },
                "description": "Group functions by package and/or receiver type"
            },
            "limit_keyword": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Limit to package paths containing one of these keywords"
            },
            "limit_prefix": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Limit to package paths starting with one of these prefixes"
            },
            "ignore": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Ignore package paths containing one of these substrings"
            },
            "nostd": {
                "type": "boolean",
                "description": "Omit calls to/from standard-library packages (default true)"
            },
            "nointer": {
                "type": "boolean",
                "description": "Omit calls involving unexported functions"
            },
            "tests": {
                "type": "boolean",
                "description": "Include test code"
            },
            "algo": {
                "type": "string",
                "enum": ["static", "cha", "rta"],
                "description": "The algorithm used to construct the call graph"
            },
            "debug": {
                "type": "boolean",
                "description": "Enable verbose log"
            },
            "max_dep": {
                "type": "integer",
                "minimum": 0,
                "description": "Maximum call depth from the roots; 0 disables the limit"
            }
        }
    })
}
