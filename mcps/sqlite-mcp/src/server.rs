//! SQLite MCP Server implementation

use mcp_common::{
    async_trait, internal_error, json_success, EmbeddableError, EmbeddableMcp, EmbeddableResult,
    McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SqliteConfig;
use crate::error::GatewayResult;
use crate::gateway::Gateway;

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for the describe_table tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DescribeTableParams {
    /// The name of the table to describe
    pub table_name: String,
}

/// Parameters for the query tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// A SELECT (or WITH ... SELECT) statement. INSERT, UPDATE, DELETE, DROP
    /// and other modifying statements are rejected.
    pub sql: String,
}

// ============================================================================
// Server Implementation
// ============================================================================

/// Read-only SQLite MCP Server
#[derive(Clone)]
pub struct SqliteMcpServer {
    gateway: Gateway,
    tool_router: ToolRouter<Self>,
}

impl SqliteMcpServer {
    /// Create a server from the resolved configuration
    pub fn new(config: &SqliteConfig) -> Self {
        Self::with_gateway(Gateway::from_config(&config.database))
    }

    pub fn with_gateway(gateway: Gateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Run a gateway call on the blocking pool and render its outcome.
    ///
    /// Gateway errors become `{"error": ...}` documents in a successful
    /// result; only a failed task or unserializable payload is an MCP error.
    async fn run<T, F>(&self, tool: &'static str, call: F) -> Result<CallToolResult, McpError>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&Gateway) -> GatewayResult<T> + Send + 'static,
    {
        let gateway = self.gateway.clone();
        let outcome = tokio::task::spawn_blocking(move || call(&gateway))
            .await
            .map_err(|e| internal_error(format!("{} task failed: {}", tool, e)))?;

        match outcome {
            Ok(payload) => json_success(&payload),
            Err(err) => {
                tracing::warn!(tool, error = %err, "Tool call returned an error");
                json_success(&err.to_response())
            }
        }
    }
}

#[tool_router]
impl SqliteMcpServer {
    /// List all tables in the database
    #[tool(description = "List all tables in the database. Returns a JSON array of table names. Use this to discover what data is available before querying.")]
    async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        self.run("list_tables", |gateway| gateway.list_tables()).await
    }

    /// Describe one table's columns, foreign keys and indexes
    #[tool(description = "Get detailed information about a specific table's structure: columns (name, type, nullable, default, primary_key), foreign keys and indexes. Use this to understand the schema before writing queries.")]
    async fn describe_table(
        &self,
        Parameters(params): Parameters<DescribeTableParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("describe_table", move |gateway| {
            gateway.describe_table(&params.table_name)
        })
        .await
    }

    /// Get the CREATE TABLE statements for every table
    #[tool(description = "Get the complete database schema as CREATE TABLE statements, keyed by table name. Use this when you need comprehensive schema information for complex queries.")]
    async fn get_schema(&self) -> Result<CallToolResult, McpError> {
        self.run("get_schema", |gateway| gateway.get_schema()).await
    }

    /// Execute a read-only query
    #[tool(description = "Execute a read-only SQL query against the database. Only SELECT and WITH queries are allowed; INSERT, UPDATE, DELETE, DROP and other modifying statements are rejected. Returns column names, rows (arrays of values) and row_count.")]
    async fn query(&self, Parameters(params): Parameters<QueryParams>) -> Result<CallToolResult, McpError> {
        self.run("query", move |gateway| gateway.query(&params.sql)).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for SqliteMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "Read-only SQLite MCP server for {}. \
                Use list_tables to discover tables, describe_table for one table's structure, \
                get_schema for all CREATE TABLE statements, and query to run SELECT statements.",
                self.gateway.database_path().display()
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for SqliteMcpServer {
    fn server_name(&self) -> &str {
        "sqlite"
    }

    fn server_description(&self) -> Option<&str> {
        Some("Read-only SQLite gateway - schema discovery and SELECT queries.")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "list_tables" => self.list_tables().await.map_err(Into::into),

            "describe_table" => {
                let params: DescribeTableParams = serde_json::from_value(params)?;
                self.describe_table(Parameters(params)).await.map_err(Into::into)
            }

            "get_schema" => self.get_schema().await.map_err(Into::into),

            "query" => {
                let params: QueryParams = serde_json::from_value(params)?;
                self.query(Parameters(params)).await.map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn server() -> SqliteMcpServer {
        SqliteMcpServer::with_gateway(Gateway::new("/nonexistent/crm.db", Duration::from_secs(1)))
    }

    #[test]
    fn test_embeddable_server_name() {
        assert_eq!(server().server_name(), "sqlite");
    }

    #[test]
    fn test_embeddable_list_tools() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 4);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        for name in ["list_tables", "describe_table", "get_schema", "query"] {
            assert!(tool_names.contains(&name), "missing tool {}", name);
        }
    }

    #[tokio::test]
    async fn test_embeddable_unknown_tool() {
        let result = server().call_tool("drop_everything", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_embeddable_bad_params() {
        let result = server().call_tool("query", serde_json::json!({ "query": 1 })).await;
        assert!(matches!(result, Err(EmbeddableError::SerdeError(_))));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_not_a_fault() {
        let result = server()
            .call_tool("list_tables", serde_json::json!({}))
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_instructions_mention_database() {
        let info = rmcp::ServerHandler::get_info(&server());
        assert!(info.instructions.unwrap().contains("/nonexistent/crm.db"));
    }
}
