//! SQLite MCP Library
//!
//! Read-only database gateway for SQLite: schema discovery and ad-hoc
//! SELECT queries for LLM agents, with writes rejected before they reach
//! the store.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use sqlite_mcp::{Gateway, SqliteMcpServer};
//! use std::time::Duration;
//!
//! let gateway = Gateway::new("crm.db", Duration::from_secs(30));
//! let tables = gateway.list_tables()?;
//!
//! let server = SqliteMcpServer::with_gateway(gateway);
//! // Use with in-memory transport or serve via stdio
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod projector;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::SqliteMcpServer;

pub use config::SqliteConfig;
pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use guard::{classify, Verdict};

// Re-export parameter types for direct API usage
pub use server::{DescribeTableParams, QueryParams};
