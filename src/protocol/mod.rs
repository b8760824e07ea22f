pub mod request;
pub mod response;

pub use request::{
    CallHierarchyArgs, CallgraphArgs, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams,
};
pub use response::{JsonRpcError, JsonRpcResponse, ToolResult, ToolResultContent};
