//! Error types for gateway operations
//!
//! Every variant carries a plain message so the wire contract does not depend
//! on the driver's error type.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serving a gateway call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The named table does not exist in the catalog
    #[error("Table '{0}' not found")]
    NotFound(String),

    /// The query failed the read-only guard
    #[error("{0}")]
    Forbidden(String),

    /// A catalog read or query execution failed in the driver
    #[error("SQL error: {0}")]
    ExecutionFailed(String),

    /// The database file is missing or cannot be opened
    #[error("Database not found: {}", .0.display())]
    Unavailable(PathBuf),
}

impl From<rusqlite::Error> for GatewayError {
    fn from(err: rusqlite::Error) -> Self {
        GatewayError::ExecutionFailed(err.to_string())
    }
}

impl GatewayError {
    /// Structured error document returned to the caller
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

/// Wire shape of every error: `{"error": "<message>"}`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
