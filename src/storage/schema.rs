//! Database schema definitions

/// SQL schema for the crawl state database
pub const SCHEMA_SQL: &str = r#"
-- Frontier registers: each row is one URL's membership in one register
-- ('pending' or 'visited'). The same URL appearing in both registers is
-- a transient bug state that reconciliation sweeps away.
CREATE TABLE IF NOT EXISTS frontier (
    url TEXT NOT NULL,
    register TEXT NOT NULL CHECK (register IN ('pending', 'visited')),
    added_at TEXT NOT NULL,
    PRIMARY KEY (url, register)
);

CREATE INDEX IF NOT EXISTS idx_frontier_register ON frontier(register);

-- Fetched page bodies, keyed by exact URL string, first write wins
CREATE TABLE IF NOT EXISTS pages (
    url TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["frontier", "pages"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
