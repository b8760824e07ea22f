//! Integration tests for the callgraph and callHierarchy handlers.
//!
//! Tests build a small Go fixture tree in a tempdir and exercise the full
//! dispatch flow through `handlers::dispatch`, asserting on the JSON-RPC
//! envelope and the rendered Mermaid text.

use std::path::Path;

use callgraph_mcp::config::ServerConfig;
use callgraph_mcp::handlers;
use callgraph_mcp::protocol::{JsonRpcRequest, JsonRpcResponse, RpcId, ToolResult};
use serde_json::{json, Value};

const SIMPLE_MAIN: &str = r#"package main

import (
	"fmt"
	"time"
)

func hello() {
	fmt.Println("Hello, World!")
}

func goodbye() {
	fmt.Println("Goodbye!")
}

func worker() {
	fmt.Println("worker start")
}

func main() {
	// initial call
	hello()

	// branch calls
	if time.Now().Unix()%2 == 0 {
		goodbye()
	} else {
		hello()
	}

	// start a goroutine
	go worker()
}
"#;

fn write_fixture(dir: &Path) {
    std::fs::write(dir.join("main.go"), SIMPLE_MAIN).unwrap();
}

fn request(id: i64, params: Value) -> JsonRpcRequest {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": params
    }))
    .unwrap()
}

async fn call_tool(name: &str, arguments: Value) -> JsonRpcResponse {
    let req = request(1, json!({"name": name, "arguments": arguments}));
    handlers::dispatch(&req, &ServerConfig::default())
        .await
        .expect("tools/call must produce a response")
}

fn diagram_text(resp: &JsonRpcResponse) -> String {
    assert!(resp.error.is_none(), "unexpected error: {:?}", resp.error);
    let result: ToolResult =
        serde_json::from_value(resp.result.clone().expect("missing result")).unwrap();
    assert!(!result.is_error);
    assert!(!result.content.is_empty(), "content must be non-empty");
    assert_eq!(result.content[0].content_type, "text");
    result.content[0].text.clone()
}

/// Find the compact Mermaid id declared for a node whose label starts with
/// the given function name.
fn mermaid_id(text: &str, func: &str) -> String {
    let needle = format!("[\"{func}<br/>");
    text.lines()
        .find(|line| line.contains(&needle))
        .and_then(|line| line.split('[').next())
        .unwrap_or_else(|| panic!("no node with label {func} in:\n{text}"))
        .to_string()
}

fn has_edge(text: &str, caller: &str, callee: &str) -> bool {
    let from = mermaid_id(text, caller);
    let to = mermaid_id(text, callee);
    text.contains(&format!("{from} --> {to}"))
}

// ---------------------------------------------------------------------------
// callgraph
// ---------------------------------------------------------------------------

#[tokio::test]
async fn callgraph_static_nostd_renders_fixture_edges() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callgraph",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": true
        }),
    )
    .await;

    assert_eq!(resp.id, Some(RpcId::Number(1)));
    let text = diagram_text(&resp);
    assert!(text.starts_with("flowchart LR\n"));
    assert!(text.contains("subgraph \"pkg:main\""), "default grouping is by package");
    assert!(has_edge(&text, "main", "hello"));
    assert!(has_edge(&text, "main", "goodbye"));
    assert!(has_edge(&text, "main", "worker"));
    assert!(!text.contains("Println"), "nostd must exclude fmt");
}

#[tokio::test]
async fn callgraph_without_nostd_includes_std_nodes() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callgraph",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": false
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(text.contains("Println"), "std calls must appear without nostd");
    assert!(text.contains("subgraph \"pkg:fmt\""));
}

#[tokio::test]
async fn callgraph_supports_all_algorithms() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    for algo in ["static", "cha", "rta"] {
        let resp = call_tool(
            "callgraph",
            json!({
                "moduleArgs": [tmp.path().to_str().unwrap()],
                "algo": algo,
                "nostd": true
            }),
        )
        .await;

        let text = diagram_text(&resp);
        assert!(
            has_edge(&text, "main", "hello"),
            "algo {algo} must keep the main->hello edge"
        );
    }
}

#[tokio::test]
async fn callgraph_group_by_type_emits_type_subgraphs() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("server.go"),
        r#"package main

type Server struct{}

func (s *Server) Run() {
	s.Step()
}

func (s *Server) Step() {}

func main() {
	srv := &Server{}
	srv.Run()
}
"#,
    )
    .unwrap();

    let resp = call_tool(
        "callgraph",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "cha",
            "nostd": true,
            "group": ["pkg", "type"]
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(text.contains("subgraph \"pkg:main\""));
    assert!(text.contains("subgraph \"type:Server\""));
    assert!(text.contains("subgraph \"type:func\""));
}

#[tokio::test]
async fn callgraph_ignore_filter_drops_packages() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callgraph",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": false,
            "ignore": ["fmt"]
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(!text.contains("Println"));
    assert!(has_edge(&text, "main", "hello"));
}

// ---------------------------------------------------------------------------
// callHierarchy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn call_hierarchy_without_symbol_starts_at_entry_points() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callHierarchy",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": true,
            "group": ["pkg"]
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(text.starts_with("flowchart LR\n"));
    assert!(text.contains("subgraph \"pkg:main\""));
    assert!(has_edge(&text, "main", "hello"));
    assert!(has_edge(&text, "main", "goodbye"));
}

#[tokio::test]
async fn call_hierarchy_downstream_from_main() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callHierarchy",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": true,
            "nointer": false,
            "group": ["pkg"],
            "symbol": "main.main",
            "direction": "downstream"
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(has_edge(&text, "main", "hello"));
    assert!(has_edge(&text, "main", "goodbye"));
}

#[tokio::test]
async fn call_hierarchy_upstream_from_hello() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callHierarchy",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "static",
            "nostd": true,
            "nointer": false,
            "group": ["pkg"],
            "symbol": "hello",
            "direction": "upstream"
        }),
    )
    .await;

    let text = diagram_text(&resp);
    assert!(has_edge(&text, "main", "hello"));
    assert!(
        !text.contains("[\"goodbye<br/>"),
        "upstream walk from hello must not pull in goodbye"
    );
}

#[tokio::test]
async fn call_hierarchy_unknown_symbol_is_internal_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callHierarchy",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "symbol": "nosuchfn"
        }),
    )
    .await;

    assert!(resp.result.is_none());
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32603);
    assert!(err.message.contains("nosuchfn"));
}

// ---------------------------------------------------------------------------
// error paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let resp = call_tool("bogus", json!({"moduleArgs": ["x"]})).await;
    assert!(resp.result.is_none(), "error responses must carry no result");
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32601);
    assert_eq!(resp.id, Some(RpcId::Number(1)));
}

#[tokio::test]
async fn missing_module_args_is_invalid_params() {
    let resp = call_tool("callgraph", json!({"algo": "static"})).await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32602);
    assert!(err.message.contains("moduleArgs"));
}

#[tokio::test]
async fn mistyped_module_args_is_invalid_params() {
    let resp = call_tool("callgraph", json!({"moduleArgs": [42]})).await;
    assert_eq!(resp.error.unwrap().code, -32602);
}

#[tokio::test]
async fn invalid_algo_is_invalid_params() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    let resp = call_tool(
        "callgraph",
        json!({
            "moduleArgs": [tmp.path().to_str().unwrap()],
            "algo": "pta"
        }),
    )
    .await;
    assert_eq!(resp.error.unwrap().code, -32602);
}

#[tokio::test]
async fn nonexistent_target_is_internal_error() {
    let resp = call_tool(
        "callgraph",
        json!({"moduleArgs": ["/nonexistent/fixture/path"]}),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32603);
    assert!(err.message.contains("/nonexistent/fixture/path"));
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let req: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": "abc-123",
        "method": "bogus/method"
    }))
    .unwrap();

    let resp = handlers::dispatch(&req, &ServerConfig::default()).await.unwrap();
    assert_eq!(resp.id, Some(RpcId::Str("abc-123".to_string())));
    assert_eq!(resp.error.unwrap().code, -32601);
}

// ---------------------------------------------------------------------------
// session surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_reports_server_info() {
    let req: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"protocolVersion": "2024-11-05", "clientInfo": {"name": "test"}}
    }))
    .unwrap();

    let resp = handlers::dispatch(&req, &ServerConfig::default()).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "callgraph-mcp");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn initialized_notification_gets_no_response() {
    let req: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }))
    .unwrap();

    assert!(handlers::dispatch(&req, &ServerConfig::default()).await.is_none());
}

#[tokio::test]
async fn tools_list_advertises_both_tools() {
    let req: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list"
    }))
    .unwrap();

    let resp = handlers::dispatch(&req, &ServerConfig::default()).await.unwrap();
    let result = resp.result.unwrap();
    let tools = result["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["callgraph", "callHierarchy"]);

    for tool in tools {
        let required = tool["inputSchema"]["required"].as_array().unwrap();
        assert!(required.iter().any(|r| r == "moduleArgs"));
    }
}
