//! Gateway facade - the four read-only operations
//!
//! Every operation opens its own [`ScopedConnection`] and drops it before
//! returning, whichever way the call ends. Connections are opened with
//! `SQLITE_OPEN_READ_ONLY`, so a statement that slips past the
//! [`guard`](crate::guard) still cannot write.

use rusqlite::{Batch, Connection, ErrorCode, OpenFlags, Statement};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::catalog::{Catalog, CatalogReader};
use crate::config::DatabaseConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::guard::{self, Verdict};
use crate::projector;
use crate::types::{QueryResult, Schema, TableDescription, TableList};

/// Progress handler granularity in SQLite VM instructions
const PROGRESS_OPS: i32 = 1_000;

/// Read-only access to one SQLite database file
#[derive(Debug, Clone)]
pub struct Gateway {
    path: PathBuf,
    timeout: Duration,
}

impl Gateway {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.path.clone(), config.timeout())
    }

    pub fn database_path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for the duration of one call.
    ///
    /// The file is checked on every acquisition; it may disappear while the
    /// server is running.
    fn connect(&self) -> GatewayResult<ScopedConnection> {
        if !self.path.is_file() {
            return Err(GatewayError::Unavailable(self.path.clone()));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.timeout)?;

        let deadline = Instant::now() + self.timeout;
        conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));

        tracing::debug!(path = %self.path.display(), "Opened database connection");
        Ok(ScopedConnection {
            conn,
            opened: Instant::now(),
        })
    }

    /// All user tables, sorted by name
    pub fn list_tables(&self) -> GatewayResult<TableList> {
        let conn = self.connect()?;
        let tables = Catalog::new(&conn).list_table_names()?;
        Ok(TableList { tables })
    }

    pub fn describe_table(&self, table: &str) -> GatewayResult<TableDescription> {
        let conn = self.connect()?;
        describe(&Catalog::new(&conn), table)
    }

    /// Verbatim CREATE TABLE statements keyed by table name
    pub fn get_schema(&self) -> GatewayResult<Schema> {
        let conn = self.connect()?;
        let schema = Catalog::new(&conn).raw_schema_statements()?;
        Ok(Schema { schema })
    }

    /// Run a read-only query.
    ///
    /// The guard runs before the store is opened. The original text, not the
    /// normalized copy the guard inspects, is what gets prepared.
    pub fn query(&self, sql: &str) -> GatewayResult<QueryResult> {
        if let Verdict::Reject(reason) = guard::classify(sql) {
            tracing::info!(%reason, "Rejected query");
            return Err(GatewayError::Forbidden(reason));
        }

        let conn = self.connect()?;
        let mut stmt = prepare_read_only(&conn, sql)?;
        let result = projector::project(&mut stmt).map_err(|e| self.execution_error(e))?;
        tracing::debug!(rows = result.row_count, "Query completed");
        Ok(result)
    }

    fn execution_error(&self, err: rusqlite::Error) -> GatewayError {
        if err.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            return GatewayError::ExecutionFailed(format!(
                "query interrupted after exceeding the {}s timeout",
                self.timeout.as_secs()
            ));
        }
        err.into()
    }
}

/// Prepare exactly one read-only statement.
///
/// Trailing whitespace, `;` and comments are fine, but a second statement
/// is an error rather than being silently dropped. The prepared statement
/// must also be one SQLite itself reports as read-only.
pub fn prepare_read_only<'c>(conn: &'c Connection, sql: &str) -> GatewayResult<Statement<'c>> {
    let mut batch = Batch::new(conn, sql);
    let stmt = batch.next()?.ok_or_else(|| {
        GatewayError::ExecutionFailed("query contains no statement".to_string())
    })?;
    if batch.next()?.is_some() {
        return Err(GatewayError::ExecutionFailed(
            "You can only execute one statement at a time.".to_string(),
        ));
    }

    if !stmt.readonly() {
        return Err(GatewayError::Forbidden(
            "Statement is not read-only. Only read-only queries are allowed.".to_string(),
        ));
    }
    Ok(stmt)
}

/// Assemble a [`TableDescription`], failing fast when the table is missing.
///
/// Column, foreign key and index lookups only run once the table is known to
/// exist.
pub fn describe<R: CatalogReader + ?Sized>(
    catalog: &R,
    table: &str,
) -> GatewayResult<TableDescription> {
    if !catalog.table_exists(table)? {
        return Err(GatewayError::NotFound(table.to_string()));
    }

    Ok(TableDescription {
        table: table.to_string(),
        columns: catalog.columns_of(table)?,
        foreign_keys: catalog.foreign_keys_of(table)?,
        indexes: catalog.indexes_of(table)?,
    })
}

/// A connection bound to one gateway call, closed when dropped
struct ScopedConnection {
    conn: Connection,
    opened: Instant,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        tracing::debug!(
            held_ms = self.opened.elapsed().as_millis() as u64,
            "Released database connection"
        );
    }
}
