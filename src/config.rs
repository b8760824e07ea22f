use std::time::Duration;

/// Default timeout for tool operations (30 seconds).
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub tool_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `CALLGRAPH_TOOL_TIMEOUT_SECS` (optional, default 30) — max seconds
    ///   per tool call before the analysis is abandoned
    pub fn from_env() -> Result<Self, String> {
        let tool_timeout_secs = match std::env::var("CALLGRAPH_TOOL_TIMEOUT_SECS") {
            Ok(val) => val.parse::<u64>().map_err(|_| {
                "CALLGRAPH_TOOL_TIMEOUT_SECS must be a positive integer".to_string()
            })?,
            Err(_) => DEFAULT_TOOL_TIMEOUT_SECS,
        };

        Ok(Self {
            tool_timeout: Duration::from_secs(tool_timeout_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}
