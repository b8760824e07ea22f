use crate::analysis::{self, Direction};
use crate::config::ServerConfig;
use crate::protocol::{CallHierarchyArgs, JsonRpcError, ToolResult};

use super::callgraph::{build_options, err_to_rpc, run_analysis};

/// Default depth limit for symbol traversal, deeper than the whole-program
/// default since a single-symbol neighborhood stays small.
const DEFAULT_MAX_DEPTH: u32 = 7;

/// Handle a `callHierarchy` tool call.
///
/// With `symbol`, traverses from that function in the requested direction;
/// without it, traverses downstream from the program's entry points.
pub async fn handle(
    args: CallHierarchyArgs,
    config: &ServerConfig,
) -> Result<ToolResult, JsonRpcError> {
    let opts = build_options(&args.base, DEFAULT_MAX_DEPTH)?;

    let direction = match &args.direction {
        Some(raw) => raw.parse::<Direction>().map_err(err_to_rpc)?,
        None => Direction::default(),
    };
    let symbol = args.symbol.clone().filter(|s| !s.trim().is_empty());

    run_analysis(config, move || {
        analysis::generate_call_hierarchy(&opts, symbol.as_deref(), direction)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CallgraphArgs;

    #[tokio::test]
    async fn invalid_direction_is_invalid_params() {
        let args = CallHierarchyArgs {
            base: CallgraphArgs {
                module_args: vec!["./simple".to_string()],
                ..CallgraphArgs::default()
            },
            symbol: Some("main.main".to_string()),
            direction: Some("sideways".to_string()),
        };
        let err = handle(args, &ServerConfig::default()).await.unwrap_err();
        assert_eq!(err.code, -32602);
        assert!(err.message.contains("sideways"));
    }
}
