use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 ID — may be a number or string per spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Arguments for the `callgraph` tool.
///
/// Field names mirror the advertised input schema: `moduleArgs` stays
/// camelCase for compatibility with existing clients, the filter options are
/// snake_case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallgraphArgs {
    #[serde(rename = "moduleArgs")]
    pub module_args: Vec<String>,
    #[serde(default)]
    pub dir: Option<String>,
    /// Focus on a specific package by name or path.
    #[serde(default)]
    pub focus: Option<String>,
    /// Grouping strategies for the rendered diagram (`pkg`, `type`).
    #[serde(default)]
    pub group: Option<Vec<String>>,
    /// Keep only edges whose package paths contain one of these keywords.
    #[serde(default)]
    pub limit_keyword: Vec<String>,
    /// Keep only edges whose package paths start with one of these prefixes.
    #[serde(default)]
    pub limit_prefix: Vec<String>,
    /// Drop edges whose package paths contain one of these substrings.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Omit calls to/from standard-library packages. Defaults to true.
    #[serde(default)]
    pub nostd: Option<bool>,
    /// Keep only calls between exported functions.
    #[serde(default)]
    pub nointer: Option<bool>,
    /// Include `_test.go` files.
    #[serde(default)]
    pub tests: bool,
    /// Call graph construction algorithm (`static`, `cha`, `rta`).
    #[serde(default)]
    pub algo: Option<String>,
    /// Enable verbose logging for this request.
    #[serde(default)]
    pub debug: bool,
    /// Maximum call depth from the entry roots; 0 disables the limit.
    #[serde(default)]
    pub max_dep: Option<u32>,
}

/// Arguments for the `callHierarchy` tool.
///
/// Superset of [`CallgraphArgs`]: adds the start symbol and the traversal
/// direction. `symbol` is optional — without it the hierarchy starts at the
/// program's entry roots (`main`/`init`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallHierarchyArgs {
    #[serde(flatten)]
    pub base: CallgraphArgs,
    #[serde(default)]
    pub symbol: Option<String>,
    /// `downstream` (callees), `upstream` (callers), or `both`.
    #[serde(default)]
    pub direction: Option<String>,
}
