//! Prompt MCP Server
//!
//! A Model Context Protocol server that exposes templated prompts, template
//! resources, and Git/GitHub workflow tools to agentic IDEs.
//!
//! # Usage
//!
//! ```bash
//! prompt-mcp [--root <path>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `prompt_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use prompt_mcp::PromptMcpServer;

/// MCP server for templated prompts and Git/GitHub workflow tools
#[derive(Parser)]
#[command(name = "prompt-mcp")]
#[command(about = "MCP server for templated prompts and Git/GitHub workflow tools")]
#[command(version)]
struct Args {
    /// Server root path (templates and plans live beneath it)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prompt_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!(root = ?args.root, "Starting prompt-mcp server");

    let server = PromptMcpServer::new(args.root)?;
    server.run().await?;

    Ok(())
}
