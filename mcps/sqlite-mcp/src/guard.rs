//! Read-only query guard
//!
//! Classifies raw SQL text by lexical keyword matching rather than parsing.
//! The text must open with `SELECT` or `WITH` and must not contain any
//! statement keyword from [`FORBIDDEN_KEYWORDS`] as a whole word.
//!
//! # Limitations
//!
//! This is a safety lint, not a sandbox. Keywords inside string literals or
//! comments are rejected too, and deliberately obfuscated SQL is not detected
//! here. The gateway pairs the guard with a read-only connection and a
//! prepared-statement read-only check (see [`crate::gateway`]).

/// Statement keywords that indicate a write or a connection-level change
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "REPLACE", "ATTACH",
    "DETACH", "VACUUM", "REINDEX", "PRAGMA",
];

/// Keywords a read-only query may start with (`WITH` covers CTEs)
const ALLOWED_PREFIXES: &[&str] = &["SELECT", "WITH"];

/// Outcome of classifying a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Reject(String),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// Classify `raw` as read-only or reject it with a reason.
///
/// The uppercased copy is only used for matching; callers execute the
/// original text.
pub fn classify(raw: &str) -> Verdict {
    let normalized = raw.trim().to_uppercase();

    let has_read_prefix = ALLOWED_PREFIXES
        .iter()
        .any(|prefix| starts_with_word(&normalized, prefix));
    let forbidden = find_forbidden_keyword(&normalized);

    match (has_read_prefix, forbidden) {
        (true, None) => Verdict::Allow,
        (true, Some(keyword)) => Verdict::Reject(format!(
            "Query contains forbidden keyword: {}. Only read-only queries are allowed.",
            keyword
        )),
        // A write statement names its keyword so the caller sees why.
        (false, Some(keyword)) => Verdict::Reject(format!(
            "Query contains forbidden keyword: {}. {}",
            keyword, PREFIX_REQUIRED
        )),
        (false, None) => Verdict::Reject(PREFIX_REQUIRED.to_string()),
    }
}

const PREFIX_REQUIRED: &str = "Only SELECT queries are allowed. Query must start with SELECT or WITH.";

/// First deny-listed keyword present as a whole word.
///
/// "First" follows [`FORBIDDEN_KEYWORDS`] order, not position in the query:
/// `SELECT 1; UPDATE t ...; INSERT ...` reports `INSERT`.
pub fn find_forbidden_keyword(text: &str) -> Option<&'static str> {
    let words: Vec<&str> = words(text).collect();
    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| words.iter().any(|word| word.eq_ignore_ascii_case(keyword)))
}

/// Identifier characters are ASCII only; anything else is a boundary.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split on non-identifier boundaries, dropping empty fragments.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.starts_with(word) && !text[word.len()..].starts_with(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(sql: &str) -> String {
        match classify(sql) {
            Verdict::Reject(reason) => reason,
            Verdict::Allow => panic!("expected {:?} to be rejected", sql),
        }
    }

    #[test]
    fn test_allows_plain_select() {
        assert!(classify("SELECT * FROM users LIMIT 10").is_allowed());
        assert!(classify("select name from users").is_allowed());
        assert!(classify("   \n\tSeLeCt 1").is_allowed());
    }

    #[test]
    fn test_allows_cte() {
        let sql = "WITH recent AS (SELECT * FROM deals) SELECT count(*) FROM recent";
        assert!(classify(sql).is_allowed());
    }

    #[test]
    fn test_rejects_non_select_prefix() {
        for sql in [
            "DROP TABLE users",
            "EXPLAIN SELECT 1",
            "VALUES (1)",
            "",
            "   ",
            "SELECTION FROM x",
            "WITHOUT ROWID",
            "(SELECT 1)",
        ] {
            assert!(rejected(sql).contains("must start with SELECT or WITH"), "{}", sql);
        }
    }

    #[test]
    fn test_write_statement_names_keyword() {
        let reason = rejected("DROP TABLE users");
        assert!(reason.starts_with("Query contains forbidden keyword: DROP"));
        assert!(reason.contains("must start with SELECT or WITH"));

        let reason = rejected("  insert into users values (1)");
        assert!(reason.starts_with("Query contains forbidden keyword: INSERT"));
    }

    #[test]
    fn test_rejects_whole_word_keywords() {
        assert!(rejected("SELECT 1; DROP TABLE users").contains("forbidden keyword: DROP"));
        assert!(rejected("WITH x AS (DELETE FROM t) SELECT 1").contains("DELETE"));
        assert!(rejected("select * from t where pragma = 1").contains("PRAGMA"));
        assert!(rejected("SELECT replace(name, 'a', 'b') FROM t").contains("REPLACE"));
    }

    #[test]
    fn test_deny_list_order_decides_reported_keyword() {
        let reason = rejected("SELECT 1; UPDATE t SET a = 1; INSERT INTO t VALUES (1)");
        assert!(reason.contains("forbidden keyword: INSERT"), "{}", reason);

        assert_eq!(find_forbidden_keyword("SELECT 1; PRAGMA x; DROP TABLE t"), Some("DROP"));
    }

    #[test]
    fn test_non_ascii_letters_are_word_boundaries() {
        assert_eq!(find_forbidden_keyword("SELECT 1 éDROP"), Some("DROP"));
        assert_eq!(find_forbidden_keyword("SELECT DELETEé"), Some("DELETE"));
        assert!(!classify("SELECT 1 ÄDROP").is_allowed());
    }

    #[test]
    fn test_identifier_substrings_are_allowed() {
        assert!(classify("SELECT created_at, updated_by FROM contacts").is_allowed());
        assert!(classify("SELECT * FROM created_at_log").is_allowed());
        assert!(classify("SELECT is_deleted, dropped_calls FROM stats").is_allowed());
        assert!(classify("SELECT insert_count FROM metrics").is_allowed());
    }

    #[test]
    fn test_keywords_inside_literals_still_reject() {
        // Lexical matching does not understand string literals.
        assert!(!classify("SELECT * FROM notes WHERE body = 'please delete me'").is_allowed());
    }

    #[test]
    fn test_punctuation_bounds_words() {
        assert_eq!(find_forbidden_keyword("SELECT 1;DROP TABLE x"), Some("DROP"));
        assert_eq!(find_forbidden_keyword("SELECT (ATTACH)"), Some("ATTACH"));
        assert_eq!(find_forbidden_keyword("SELECT DROPS"), None);
        assert_eq!(find_forbidden_keyword("SELECT x_vacuum_y"), None);
    }
}
