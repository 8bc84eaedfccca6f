//! Error helpers for MCP servers
//!
//! Domain errors that the caller should see are returned as tool payloads;
//! an MCP error is reserved for failures of the server itself.

use rmcp::ErrorData as McpError;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Create an internal error with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}
