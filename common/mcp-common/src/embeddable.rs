//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host call an MCP server's tools directly,
//! without spawning a subprocess or speaking the stdio protocol.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let tables = server.call_tool_json("list_tables", serde_json::json!({})).await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

use crate::result::text_content;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// The tool returned no text content to decode
    #[error("tool returned no text content")]
    EmptyResult,

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// MCP protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Trait for MCP servers that can be executed in-process
///
/// Servers built on rmcp's `#[tool_router]` implement `list_tools` by
/// delegating to their router and `call_tool` by matching on the tool name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name as used in MCP configuration files
    fn server_name(&self) -> &str;

    /// All available tools with their input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name with JSON object parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Execute a tool and decode its JSON text payload
    async fn call_tool_json(&self, name: &str, params: Value) -> EmbeddableResult<Value> {
        let result = self.call_tool(name, params).await?;
        let text = text_content(&result).ok_or(EmbeddableError::EmptyResult)?;
        Ok(serde_json::from_str(text)?)
    }

    fn server_description(&self) -> Option<&str> {
        None
    }
}
