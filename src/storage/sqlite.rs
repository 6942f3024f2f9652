//! SQLite storage implementation
//!
//! One embedded database file holds both the frontier registers and the
//! fetched page bodies, so crawl state survives process restarts.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    FrontierBackend, PageSink, Register, StorageError, StorageResult,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed frontier and page store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the crawl state database at `path`
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (tests, throwaway runs)
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl FrontierBackend for SqliteStore {
    fn insert(&mut self, register: Register, url: &str) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO frontier (url, register, added_at) VALUES (?1, ?2, ?3)",
            params![url, register.as_str(), now],
        )?;
        Ok(changed > 0)
    }

    fn remove(&mut self, register: Register, url: &str) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM frontier WHERE url = ?1 AND register = ?2",
            params![url, register.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn contains(&self, register: Register, url: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM frontier WHERE url = ?1 AND register = ?2",
                params![url, register.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn members(&self, register: Register) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM frontier WHERE register = ?1")?;
        let urls = stmt
            .query_map(params![register.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    fn count(&self, register: Register) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM frontier WHERE register = ?1",
            params![register.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn pop_and_visit(&mut self) -> StorageResult<Option<String>> {
        let tx = self.conn.transaction()?;

        let url: Option<String> = tx
            .query_row(
                "SELECT url FROM frontier WHERE register = 'pending' LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(ref url) = url {
            let now = Utc::now().to_rfc3339();
            tx.execute(
                "DELETE FROM frontier WHERE url = ?1 AND register = 'pending'",
                params![url],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO frontier (url, register, added_at) VALUES (?1, 'visited', ?2)",
                params![url, now],
            )?;
        }

        tx.commit()?;
        Ok(url)
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM frontier", [])?;
        Ok(())
    }
}

impl PageSink for SqliteStore {
    fn store_page(&mut self, url: &str, body: &str) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO pages (url, body, fetched_at) VALUES (?1, ?2, ?3)",
            params![url, body, now],
        )?;
        Ok(changed > 0)
    }

    fn page_body(&self, url: &str) -> StorageResult<Option<String>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM pages WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    fn page_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear_pages(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM pages", [])?;
        Ok(())
    }
}
