//! Lanyard MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing Discord presence data from
//! the Lanyard API over stdio.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use lanyard_mcp_server::config::Config;
use lanyard_mcp_server::error::Result;
use lanyard_mcp_server::lanyard::client::LanyardClient;
use lanyard_mcp_server::mcp::server::McpServer;

/// Lanyard MCP Server
#[derive(Parser)]
#[command(name = "lanyard-mcp-server")]
#[command(author, version, about = "Lanyard MCP Server - Discord presence tools for AI agents")]
struct Cli {
    /// Lanyard API base URL (overrides LANYARD_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds (overrides LANYARD_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single tool call and print its output
    Query {
        /// Tool name: get_user_presence, get_user_spotify or get_user_kv
        tool: String,

        /// Discord user ID
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let lanyard_client = Arc::new(LanyardClient::new(load_config(&cli)?)?);
    tracing::info!(
        api_base = %lanyard_client.config().api_base_url,
        timeout_secs = lanyard_client.config().request_timeout.as_secs(),
        "Starting Lanyard MCP server"
    );

    match cli.command {
        Some(Commands::Query { tool, user_id }) => {
            let server = McpServer::new(lanyard_client);
            let result = server
                .tool_handler()
                .call_tool(&tool, serde_json::json!({ "user_id": user_id }))
                .await;
            println!("{}", result.text_content());
            if result.is_error {
                std::process::exit(1);
            }
        }
        None => {
            // Run MCP server
            let mut server = McpServer::new(lanyard_client);
            server.run_stdio().await?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::new()?;

    if let Some(base) = &cli.api_base {
        config = config.with_api_base_url(base.as_str())?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs))?;
    }

    Ok(config)
}
