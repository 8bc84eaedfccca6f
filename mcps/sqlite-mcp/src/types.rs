//! Response and descriptor types for the gateway tools

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

// ============================================================================
// Catalog Descriptors
// ============================================================================

/// One column of a table, in catalog ordinal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub nullable: bool,
    #[serde(rename = "default")]
    pub default_value: Option<String>,
    #[serde(rename = "primary_key")]
    pub is_primary_key: bool,
}

/// Foreign key from a column of the described table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyDescriptor {
    #[serde(rename = "column")]
    pub source_column: String,
    #[serde(rename = "references_table")]
    pub target_table: String,
    /// `None` when the constraint implicitly targets the parent's primary key
    #[serde(rename = "references_column")]
    pub target_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDescriptor {
    pub name: String,
    #[serde(rename = "unique")]
    pub is_unique: bool,
    pub columns: Vec<String>,
}

// ============================================================================
// Tool Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableList {
    pub tables: Vec<String>,
}

/// Full structure of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
}

/// Table name to its verbatim CREATE statement, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub schema: BTreeMap<String, String>,
}

/// Query result with column info and rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Column names
    pub columns: Vec<String>,
    /// Rows as arrays of values, one value per column
    pub rows: Vec<Vec<SqlValue>>,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResult {
    /// Build a result, computing `row_count` from the collected rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A single SQLite value with its storage class
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// TEXT that is not valid UTF-8 is an error, never silently repaired.
impl TryFrom<rusqlite::types::ValueRef<'_>> for SqlValue {
    type Error = rusqlite::Error;

    fn try_from(value: rusqlite::types::ValueRef<'_>) -> Result<Self, Self::Error> {
        use rusqlite::types::ValueRef;

        Ok(match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(rusqlite::Error::Utf8Error)?;
                SqlValue::Text(text.to_string())
            }
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        })
    }
}

/// Blobs serialize as `{"blob": "<base64>"}` so they stay distinguishable
/// from text.
impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_unit(),
            SqlValue::Integer(i) => serializer.serialize_i64(*i),
            SqlValue::Real(f) => serializer.serialize_f64(*f),
            SqlValue::Text(s) => serializer.serialize_str(s),
            SqlValue::Blob(bytes) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("blob", &STANDARD.encode(bytes))?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::ValueRef;
    use serde_json::json;

    #[test]
    fn test_value_serialization() {
        let row = vec![
            SqlValue::Null,
            SqlValue::Integer(42),
            SqlValue::Real(1.5),
            SqlValue::Text("Acme".to_string()),
            SqlValue::Blob(vec![0xde, 0xad, 0xbe, 0xef]),
        ];
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!([null, 42, 1.5, "Acme", { "blob": "3q2+7w==" }])
        );
    }

    #[test]
    fn test_value_from_driver_ref() {
        assert_eq!(SqlValue::try_from(ValueRef::Integer(7)).unwrap(), SqlValue::Integer(7));
        assert_eq!(
            SqlValue::try_from(ValueRef::Text(b"abc")).unwrap(),
            SqlValue::Text("abc".into())
        );
        assert_eq!(SqlValue::try_from(ValueRef::Null).unwrap(), SqlValue::Null);
    }

    #[test]
    fn test_invalid_utf8_text_is_rejected() {
        let result = SqlValue::try_from(ValueRef::Text(&[0xff, 0x41]));
        assert!(matches!(result, Err(rusqlite::Error::Utf8Error(_))));
        // the same bytes stored as a blob are fine
        assert_eq!(
            SqlValue::try_from(ValueRef::Blob(&[0xff, 0x41])).unwrap(),
            SqlValue::Blob(vec![0xff, 0x41])
        );
    }

    #[test]
    fn test_column_wire_names() {
        let column = ColumnDescriptor {
            name: "id".to_string(),
            declared_type: "INTEGER".to_string(),
            nullable: false,
            default_value: None,
            is_primary_key: true,
        };
        assert_eq!(
            serde_json::to_value(&column).unwrap(),
            json!({ "name": "id", "type": "INTEGER", "nullable": false, "default": null, "primary_key": true })
        );

        let fk = ForeignKeyDescriptor {
            source_column: "company_id".to_string(),
            target_table: "companies".to_string(),
            target_column: Some("id".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&fk).unwrap(),
            json!({ "column": "company_id", "references_table": "companies", "references_column": "id" })
        );
    }

    #[test]
    fn test_query_result_counts_rows() {
        let result = QueryResult::new(
            vec!["n".to_string()],
            vec![vec![SqlValue::Integer(1)], vec![SqlValue::Integer(2)]],
        );
        assert_eq!(result.row_count, 2);
    }
}
