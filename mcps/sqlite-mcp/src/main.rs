//! SQLite MCP Server
//!
//! Serves the read-only SQLite gateway over stdio.
//!
//! # Usage
//!
//! ```bash
//! sqlite-mcp --database ./crm.db
//! ```
//!
//! Or configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "sqlite": {
//!       "command": "./target/release/sqlite-mcp",
//!       "args": ["--database", "./crm.db"]
//!     }
//!   }
//! }
//! ```

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use std::path::PathBuf;

use sqlite_mcp::{SqliteConfig, SqliteMcpServer};

#[derive(Parser)]
#[command(name = "sqlite-mcp")]
#[command(about = "Read-only SQLite MCP server")]
struct Args {
    /// Path to the SQLite database file (overrides the config file)
    #[arg(short, long, env = "SQLITE_MCP_DATABASE")]
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, env = "SQLITE_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Query timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging to stderr (stdout is used for MCP protocol)
    mcp_common::init_tracing("sqlite_mcp")?;

    let mut config = SqliteConfig::load(args.config.as_deref())?;
    if let Some(path) = args.database {
        config.database.path = path;
    }
    if let Some(secs) = args.timeout_secs {
        config.database.timeout_secs = secs;
    }

    // Nothing can succeed without the database
    if let Err(err) = config.database.ensure_exists() {
        eprintln!("Error: {}", err);
        eprintln!("Create and seed the database first, or pass --database <path>.");
        std::process::exit(1);
    }

    tracing::info!(
        "Starting SQLite MCP Server with database: {}",
        config.database.path.display()
    );

    let server = SqliteMcpServer::new(&config);
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
