//! MCP server exposing Go call graph tools.
//!
//! Exposes `callgraph` and `callHierarchy` tools over JSON-RPC 2.0 stdio
//! transport, compatible with any MCP-aware AI agent. Diagrams are returned
//! as Mermaid flowchart text.

pub mod analysis;
pub mod config;
pub mod handlers;
pub mod protocol;
pub mod server;

pub mod schema;
