//! CLI argument definitions for vonage-mcp.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vonage-mcp: Vonage communication tools for MCP clients.
#[derive(Parser)]
#[command(
    name = "vonage-mcp",
    version,
    about = "MCP server for Vonage messaging, voice and account APIs",
    long_about = "Exposes Vonage SMS, WhatsApp, RCS, voice, balance, application and number \
                  tools to MCP clients over stdio. Configuration is read from the environment \
                  and an optional .env file."
)]
pub struct Cli {
    /// Default log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Load environment variables from this file instead of `./.env`.
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP over stdin/stdout (the default).
    Serve,

    /// Show which credentials and senders are configured.
    Status,

    /// List the tools the server exposes.
    Tools,
}
