use std::path::PathBuf;

use crate::analysis::{self, AnalysisError, AnalysisOptions};
use crate::config::ServerConfig;
use crate::protocol::{CallgraphArgs, JsonRpcError, ToolResult};

/// Default depth limit for the whole-program call graph.
const DEFAULT_MAX_DEPTH: u32 = 4;

/// Handle a `callgraph` tool call.
pub async fn handle(args: CallgraphArgs, config: &ServerConfig) -> Result<ToolResult, JsonRpcError> {
    let opts = build_options(&args, DEFAULT_MAX_DEPTH)?;
    run_analysis(config, move || analysis::generate_callgraph(&opts)).await
}

/// Run a synchronous analysis closure on a blocking task under the configured
/// timeout, mapping every failure mode onto a JSON-RPC error.
pub(super) async fn run_analysis<F>(
    config: &ServerConfig,
    job: F,
) -> Result<ToolResult, JsonRpcError>
where
    F: FnOnce() -> Result<String, AnalysisError> + Send + 'static,
{
    let timeout = config.tool_timeout;
    let task = tokio::task::spawn_blocking(job);

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(diagram))) => Ok(ToolResult::text(diagram)),
        Ok(Ok(Err(err))) => {
            tracing::warn!(error = %err, "analysis failed");
            Err(err_to_rpc(err))
        }
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "analysis task panicked");
            Err(JsonRpcError::internal_error("analysis task failed"))
        }
        Err(_) => {
            tracing::warn!(secs = timeout.as_secs(), "analysis timed out");
            Err(JsonRpcError::internal_error(format!(
                "analysis timed out after {} seconds",
                timeout.as_secs()
            )))
        }
    }
}

pub(super) fn err_to_rpc(err: AnalysisError) -> JsonRpcError {
    JsonRpcError {
        code: err.json_rpc_code(),
        message: err.to_string(),
        data: None,
    }
}

/// Map wire arguments onto resolved analysis options, applying the
/// documented defaults.
pub(super) fn build_options(
    args: &CallgraphArgs,
    default_max_depth: u32,
) -> Result<AnalysisOptions, JsonRpcError> {
    if args.module_args.is_empty() {
        return Err(JsonRpcError::invalid_params("moduleArgs is required"));
    }

    let targets: Vec<PathBuf> = args
        .module_args
        .iter()
        .map(|arg| match &args.dir {
            Some(dir) => PathBuf::from(dir).join(arg),
            None => PathBuf::from(arg),
        })
        .collect();

    let algo = match &args.algo {
        Some(raw) => raw.parse().map_err(err_to_rpc)?,
        None => analysis::Algo::default(),
    };

    let group = match &args.group {
        Some(values) => AnalysisOptions::parse_group(values).map_err(err_to_rpc)?,
        None => vec![analysis::GroupBy::Pkg],
    };

    Ok(AnalysisOptions {
        targets,
        focus: args.focus.clone().filter(|f| !f.trim().is_empty()),
        group,
        limit_keyword: AnalysisOptions::clean_paths(&args.limit_keyword),
        limit_prefix: AnalysisOptions::clean_paths(&args.limit_prefix),
        ignore: AnalysisOptions::clean_paths(&args.ignore),
        nostd: args.nostd.unwrap_or(true),
        nointer: args.nointer.unwrap_or(false),
        tests: args.tests,
        algo,
        max_depth: args.max_dep.unwrap_or(default_max_depth),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Algo, GroupBy};

    fn args(module_args: &[&str]) -> CallgraphArgs {
        CallgraphArgs {
            module_args: module_args.iter().map(|s| s.to_string()).collect(),
            ..CallgraphArgs::default()
        }
    }

    #[test]
    fn defaults_match_the_documented_contract() {
        let opts = build_options(&args(&["./simple"]), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(opts.algo, Algo::Rta);
        assert_eq!(opts.group, vec![GroupBy::Pkg]);
        assert!(opts.nostd);
        assert!(!opts.nointer);
        assert_eq!(opts.max_depth, 4);
    }

    #[test]
    fn empty_module_args_rejected() {
        let err = build_options(&args(&[]), DEFAULT_MAX_DEPTH).unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn invalid_algo_is_invalid_params() {
        let mut a = args(&["./simple"]);
        a.algo = Some("pta".to_string());
        let err = build_options(&a, DEFAULT_MAX_DEPTH).unwrap_err();
        assert_eq!(err.code, -32602);
        assert!(err.message.contains("pta"));
    }

    #[test]
    fn dir_prefixes_targets() {
        let mut a = args(&["simple"]);
        a.dir = Some("/work".to_string());
        let opts = build_options(&a, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(opts.targets, vec![PathBuf::from("/work/simple")]);
    }
}
