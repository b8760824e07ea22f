//! Call graph analysis: Go source discovery, extraction, graph construction,
//! filtering, traversal, and Mermaid rendering.
//!
//! This is the collaborator behind the MCP tool handlers. It is synchronous
//! throughout; the handlers run it on a blocking task under a timeout.

pub mod extract;
pub mod filter;
pub mod graph;
pub mod hierarchy;
pub mod mermaid;
pub mod options;
pub mod source;
pub mod stdlib;

use thiserror::Error;

pub use options::{Algo, AnalysisOptions, Direction, GroupBy};

/// Errors produced by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid call graph algorithm: {0}")]
    InvalidAlgo(String),

    #[error("invalid group option: {0}")]
    InvalidGroup(String),

    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("target does not exist: {0}")]
    MissingTarget(String),

    #[error("no Go source files found under: {0}")]
    NoSources(String),

    #[error("no main packages")]
    NoMainPackages,

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("parse error: {message} (path: {path})")]
    Parse { message: String, path: String },

    #[error("walk error: {0}")]
    Walk(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Option/value errors → -32602 (Invalid params)
    /// Analysis failures   → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidAlgo(_) | Self::InvalidGroup(_) | Self::InvalidDirection(_) => -32602,
            Self::MissingTarget(_)
            | Self::NoSources(_)
            | Self::NoMainPackages
            | Self::SymbolNotFound(_)
            | Self::Parse { .. }
            | Self::Walk(_)
            | Self::Io(_) => -32603,
        }
    }
}

/// Build, filter, and render the full call graph for the `callgraph` tool.
pub fn generate_callgraph(opts: &AnalysisOptions) -> Result<String, AnalysisError> {
    let files = source::load(&opts.targets, opts.tests)?;
    let graph = graph::build(&files, opts.algo)?;
    let filtered = filter::apply(&graph, opts);

    tracing::debug!(
        algo = opts.algo.as_str(),
        nodes = filtered.functions.len(),
        edges = filtered.calls.len(),
        "callgraph resolved"
    );

    Ok(mermaid::render(&filtered, &opts.group))
}

/// Build the graph and render the traversal from a symbol (or from the entry
/// roots when no symbol is given) for the `callHierarchy` tool.
pub fn generate_call_hierarchy(
    opts: &AnalysisOptions,
    symbol: Option<&str>,
    direction: Direction,
) -> Result<String, AnalysisError> {
    let files = source::load(&opts.targets, opts.tests)?;
    let graph = graph::build(&files, opts.algo)?;

    // Depth is counted from the traversal start here, not from the entry
    // roots, so the edge filters run without the depth limit.
    let mut filter_opts = opts.clone();
    filter_opts.max_depth = 0;
    let filtered = filter::apply(&graph, &filter_opts);

    let starts = match symbol {
        Some(sym) => {
            let id = hierarchy::find_symbol(&graph, sym)
                .ok_or_else(|| AnalysisError::SymbolNotFound(sym.to_string()))?;
            vec![id]
        }
        None => hierarchy::default_roots(&filtered),
    };

    let sub = hierarchy::traverse(&filtered, &starts, direction, opts.max_depth);

    tracing::debug!(
        direction = ?direction,
        starts = starts.len(),
        nodes = sub.functions.len(),
        edges = sub.calls.len(),
        "call hierarchy resolved"
    );

    Ok(mermaid::render(&sub, &opts.group))
}
