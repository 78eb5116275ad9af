//! MCP server for vonage-mcp.
//!
//! Exposes the Vonage tool adapters to MCP clients as newline-delimited
//! JSON-RPC 2.0 over stdio.

pub mod error;
pub mod mcp;
pub mod transport;

pub use error::{Result, ServerError};
pub use mcp::McpServer;
pub use transport::{serve, serve_stdio};
