//! CLI entry point for vonage-mcp.
//!
//! This binary provides the `vonage-mcp` command.  With no subcommand it
//! serves MCP over stdio; `status` and `tools` inspect the configuration.

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vonage_mcp_adapters::{Adapter, VonageServices, vonage_adapters};
use vonage_mcp_provider::config::{
    ENV_API_KEY, ENV_API_SECRET, ENV_APPLICATION_ID, ENV_PRIVATE_KEY64, ENV_RCS_SENDER_ID,
    ENV_VIRTUAL_NUMBER, ENV_WHATSAPP_NUMBER,
};
use vonage_mcp_provider::{VonageClient, VonageConfig};
use vonage_mcp_server::{McpServer, serve_stdio};

use crate::cli::{Cli, Commands};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_env(cli.env_file.as_deref())?;
    init_tracing(&cli.log_level);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve().await,
        Commands::Status => cmd_status().await,
        Commands::Tools => cmd_tools(),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve() -> Result<()> {
    let config = load_config()?;
    for name in config.missing_credentials() {
        warn!(variable = name, "credential not set; tools that need it will fail");
    }

    let server = McpServer::new(vonage_adapters(build_services(&config)?));
    info!(
        version = env!("CARGO_PKG_VERSION"),
        tools = server.list_tools().len(),
        "starting vonage-mcp"
    );

    serve_stdio(&server)
        .await
        .context("MCP stdio transport failed")?;

    info!("vonage-mcp stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

async fn cmd_status() -> Result<()> {
    let config = load_config()?;

    println!("vonage-mcp v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  Credentials:");
    print_presence(ENV_API_KEY, config.api_key.is_some());
    print_presence(ENV_API_SECRET, config.api_secret.is_some());
    print_presence(ENV_APPLICATION_ID, config.application_id.is_some());
    print_presence(ENV_PRIVATE_KEY64, config.private_key.is_some());
    println!();
    println!("  Senders:");
    print_presence(ENV_VIRTUAL_NUMBER, config.senders.virtual_number.is_some());
    print_presence(ENV_WHATSAPP_NUMBER, config.senders.whatsapp_number.is_some());
    print_presence(ENV_RCS_SENDER_ID, config.senders.rcs_sender_id.is_some());
    println!();
    println!("  Endpoints:");
    println!("    {:<24} {}", "API", config.api_base_url);
    println!("    {:<24} {}", "REST", config.rest_base_url);
    println!();
    println!("  Adapters:");
    for adapter in vonage_adapters(build_services(&config)?) {
        let health = adapter
            .health_check()
            .await
            .with_context(|| format!("health check failed for `{}`", adapter.id()))?;
        println!(
            "    {:<24} {} ({} tools)",
            adapter.id(),
            health,
            adapter.tools().len()
        );
    }
    println!();

    Ok(())
}

fn print_presence(name: &str, present: bool) {
    println!(
        "    {:<24} {}",
        name,
        if present { "set" } else { "MISSING" }
    );
}

// ---------------------------------------------------------------------------
// Subcommand: tools
// ---------------------------------------------------------------------------

fn cmd_tools() -> Result<()> {
    // Tool definitions do not depend on credentials, so default config is
    // enough to list them.
    let config = VonageConfig::from_lookup(|_| None).context("failed to build default config")?;
    let adapters: Vec<Arc<dyn Adapter>> = vonage_adapters(build_services(&config)?);

    for adapter in &adapters {
        println!("[{}]", adapter.adapter_type());
        for tool in adapter.tools() {
            println!("  {:<40} {}", tool.name, tool.description);
        }
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load `.env` (or `path`) into the process environment.  A missing default
/// file is not an error; a missing explicit file is.
fn load_env(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("failed to load .env"),
        },
    }
    Ok(())
}

fn load_config() -> Result<VonageConfig> {
    VonageConfig::from_env().context("invalid Vonage configuration")
}

fn build_services(config: &VonageConfig) -> Result<VonageServices> {
    let client = VonageClient::new(config).context("failed to build Vonage client")?;
    Ok(VonageServices::from_client(
        Arc::new(client),
        &config.senders,
    ))
}

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr; stdout carries the protocol.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
