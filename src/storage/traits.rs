//! Storage traits and error types

use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Any of these is fatal to the crawl loop: a frontier or page store that
/// cannot persist leaves crawl state out of sync with real progress.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The two URL registers the frontier keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Discovered, not yet processed
    Pending,
    /// Processed (or explicitly rejected); terminal
    Visited,
}

impl Register {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
        }
    }
}

/// Set-store capability backing the frontier
///
/// Semantics mirror a pair of string sets: inserting an existing member or
/// removing an absent one is a silent no-op, never an error. Only real
/// persistence failures surface as `StorageError`.
pub trait FrontierBackend {
    /// Adds a URL to a register. Returns true if it was newly inserted.
    fn insert(&mut self, register: Register, url: &str) -> StorageResult<bool>;

    /// Removes a URL from a register. Returns true if it was present.
    fn remove(&mut self, register: Register, url: &str) -> StorageResult<bool>;

    /// Membership test.
    fn contains(&self, register: Register, url: &str) -> StorageResult<bool>;

    /// All members of a register, in no meaningful order.
    fn members(&self, register: Register) -> StorageResult<Vec<String>>;

    /// Member count of a register.
    fn count(&self, register: Register) -> StorageResult<u64>;

    /// Atomically removes one arbitrary pending URL and adds it to the
    /// visited register, as a single transaction. No caller may observe a
    /// state where the URL is in neither or both registers. Returns `None`
    /// when pending is empty.
    fn pop_and_visit(&mut self) -> StorageResult<Option<String>>;

    /// Drops both registers (start-fresh).
    fn clear(&mut self) -> StorageResult<()>;
}

/// Durable write-once store of fetched page bodies
pub trait PageSink {
    /// Persists a page body for a URL. First write wins: if the URL is
    /// already stored the call is a no-op and returns false.
    fn store_page(&mut self, url: &str, body: &str) -> StorageResult<bool>;

    /// Returns the stored body for a URL, if any.
    fn page_body(&self, url: &str) -> StorageResult<Option<String>>;

    /// Number of stored pages.
    fn page_count(&self) -> StorageResult<u64>;

    /// Drops all stored pages (start-fresh).
    fn clear_pages(&mut self) -> StorageResult<()>;
}
