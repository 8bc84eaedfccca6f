//! Catalog reader - table, column, foreign key and index metadata
//!
//! All access to `sqlite_master` and the `pragma_*` table-valued functions
//! lives here. Table and index names are bound as parameters, never spliced
//! into the SQL text.

use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::collections::BTreeMap;

use crate::types::{ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor};

/// Placeholder for index members that are expressions rather than columns
const EXPRESSION_COLUMN: &str = "<expression>";

/// Catalog facts the gateway needs, independent of how they are stored
pub trait CatalogReader {
    /// User tables, excluding internal tables, sorted by name
    fn list_table_names(&self) -> SqliteResult<Vec<String>>;

    fn table_exists(&self, name: &str) -> SqliteResult<bool>;

    /// Columns ordered by their position in the table definition
    fn columns_of(&self, table: &str) -> SqliteResult<Vec<ColumnDescriptor>>;

    fn foreign_keys_of(&self, table: &str) -> SqliteResult<Vec<ForeignKeyDescriptor>>;

    /// Indexes with their member columns in index order
    fn indexes_of(&self, table: &str) -> SqliteResult<Vec<IndexDescriptor>>;

    /// Verbatim CREATE TABLE text for every user table, keyed by table name
    fn raw_schema_statements(&self) -> SqliteResult<BTreeMap<String, String>>;
}

/// [`CatalogReader`] over `sqlite_master` and the pragma functions
pub struct Catalog<'c> {
    conn: &'c Connection,
}

impl<'c> Catalog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn index_columns(&self, index: &str) -> SqliteResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;

        let columns = stmt
            .query_map(params![index], |row| row.get::<_, Option<String>>(0))?
            .map(|name| name.map(|n| n.unwrap_or_else(|| EXPRESSION_COLUMN.to_string())))
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(columns)
    }
}

impl CatalogReader for Catalog<'_> {
    fn list_table_names(&self) -> SqliteResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(names)
    }

    fn table_exists(&self, name: &str) -> SqliteResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn columns_of(&self, table: &str) -> SqliteResult<Vec<ColumnDescriptor>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1) ORDER BY cid",
        )?;

        let columns = stmt
            .query_map(params![table], |row| {
                Ok(ColumnDescriptor {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    nullable: row.get::<_, i64>(2)? == 0,
                    default_value: row.get(3)?,
                    is_primary_key: row.get::<_, i64>(4)? != 0,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(columns)
    }

    fn foreign_keys_of(&self, table: &str) -> SqliteResult<Vec<ForeignKeyDescriptor>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"from\", \"table\", \"to\" \
             FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
        )?;

        let foreign_keys = stmt
            .query_map(params![table], |row| {
                Ok(ForeignKeyDescriptor {
                    source_column: row.get(0)?,
                    target_table: row.get(1)?,
                    target_column: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(foreign_keys)
    }

    // One extra pragma_index_info lookup per index
    fn indexes_of(&self, table: &str) -> SqliteResult<Vec<IndexDescriptor>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, \"unique\" FROM pragma_index_list(?1) ORDER BY seq")?;

        let listed = stmt
            .query_map(params![table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        listed
            .into_iter()
            .map(|(name, is_unique)| -> SqliteResult<IndexDescriptor> {
                let columns = self.index_columns(&name)?;
                Ok(IndexDescriptor {
                    name,
                    is_unique,
                    columns,
                })
            })
            .collect()
    }

    fn raw_schema_statements(&self) -> SqliteResult<BTreeMap<String, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;

        let schema = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                ))
            })?
            .collect::<SqliteResult<BTreeMap<_, _>>>()?;
        Ok(schema)
    }
}
