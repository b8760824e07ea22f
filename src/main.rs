use clap::Parser;
use tracing_subscriber::EnvFilter;

use callgraph_mcp::config::ServerConfig;
use callgraph_mcp::server::McpServer;

/// MCP server exposing Go call graph tools over stdio.
#[derive(Parser)]
#[command(name = "callgraph-mcp", version)]
struct Cli {
    /// Enable verbose logging on stderr.
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the protocol; diagnostics go to stderr only.
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("callgraph-mcp: configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("starting callgraph-mcp server");

    let mut server = McpServer::new(config);
    if let Err(e) = server.run().await {
        eprintln!("callgraph-mcp: fatal error: {e}");
        std::process::exit(1);
    }
}
