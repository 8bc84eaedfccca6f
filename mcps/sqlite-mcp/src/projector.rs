//! Result projector - driver rows to [`QueryResult`]

use rusqlite::{Result as SqliteResult, Statement};

use crate::types::{QueryResult, SqlValue};

/// Execute a prepared statement and collect every row eagerly.
///
/// Column names come from the statement itself, so a statement that yields
/// no result columns produces an empty `columns` list. Values keep their
/// storage class; nothing is coerced, and TEXT that is not valid UTF-8 fails
/// the whole projection.
pub fn project(stmt: &mut Statement<'_>) -> SqliteResult<QueryResult> {
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let values = (0..width)
            .map(|i| row.get_ref(i).and_then(SqlValue::try_from))
            .collect::<SqliteResult<Vec<_>>>()?;
        rows.push(values);
    }

    Ok(QueryResult::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn run(conn: &Connection, sql: &str) -> QueryResult {
        let mut stmt = conn.prepare(sql).unwrap();
        project(&mut stmt).unwrap()
    }

    #[test]
    fn test_select_literal() {
        let conn = Connection::open_in_memory().unwrap();
        let result = run(&conn, "SELECT 1");
        assert_eq!(result.columns, vec!["1"]);
        assert_eq!(result.rows, vec![vec![SqlValue::Integer(1)]]);
        assert_eq!(result.row_count, 1);
    }

    #[test]
    fn test_preserves_types_and_order() {
        let conn = Connection::open_in_memory().unwrap();
        let result = run(
            &conn,
            "SELECT 'Acme' AS name, 3 AS n, 2.5 AS score, NULL AS missing, x'0102' AS raw",
        );
        assert_eq!(result.columns, vec!["name", "n", "score", "missing", "raw"]);
        assert_eq!(
            result.rows[0],
            vec![
                SqlValue::Text("Acme".to_string()),
                SqlValue::Integer(3),
                SqlValue::Real(2.5),
                SqlValue::Null,
                SqlValue::Blob(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE users (id INTEGER, Email TEXT)").unwrap();

        let result = run(&conn, "SELECT id, Email FROM users");
        assert_eq!(result.columns, vec!["id", "Email"]);
        assert!(result.rows.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_invalid_utf8_text_fails() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT CAST(x'ff41' AS TEXT)").unwrap();
        assert!(matches!(project(&mut stmt), Err(rusqlite::Error::Utf8Error(_))));
    }

    #[test]
    fn test_every_row_matches_column_count() {
        let conn = Connection::open_in_memory().unwrap();
        let result = run(
            &conn,
            "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 25) \
             SELECT x, x * x FROM n",
        );
        assert_eq!(result.row_count, result.rows.len());
        assert_eq!(result.row_count, 25);
        assert!(result.rows.iter().all(|row| row.len() == result.columns.len()));
    }
}
