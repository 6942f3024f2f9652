//! Storage module for persisting crawl state
//!
//! This module owns everything that outlives a single process run:
//! - the frontier's `pending`/`visited` URL registers
//! - fetched page bodies (first-write-wins)
//! - the optional content-addressed page-file mirror on disk
//!
//! The frontier and page stores are capability traits so the crawl engine
//! can run against the embedded SQLite database or a plain in-memory store
//! interchangeably.

mod memory;
mod pages;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use pages::PageFiles;
pub use sqlite::SqliteStore;
pub use traits::{FrontierBackend, PageSink, Register, StorageError, StorageResult};
