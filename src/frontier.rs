//! Frontier store
//!
//! The frontier tracks two disjoint URL registers: `pending` (discovered,
//! not yet processed) and `visited` (processed, terminal). A URL moves to
//! `visited` at the moment it is popped for processing, before the fetch
//! completes; a crash mid-fetch therefore never causes a retry loop, and a
//! failed fetch forfeits the URL for the rest of the run.

use crate::storage::{FrontierBackend, Register, StorageResult};
use crate::url::{LinkFilter, SiteBase};

/// Crawl-frontier semantics over a set-store backend
pub struct Frontier<B: FrontierBackend> {
    backend: B,
}

impl<B: FrontierBackend> Frontier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access to the underlying store (the engine also keeps page bodies
    /// in the same store).
    pub fn store(&self) -> &B {
        &self.backend
    }

    pub fn store_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Clears both registers for a start-fresh crawl
    pub fn start_fresh(&mut self) -> StorageResult<()> {
        self.backend.clear()
    }

    /// Inserts the seed URL into pending unless it has already been
    /// visited (resumed runs keep their progress).
    pub fn seed(&mut self, url: &str) -> StorageResult<()> {
        self.enqueue_if_new(url)
    }

    /// Atomically removes one arbitrary pending URL, marking it visited.
    /// Returns `None` when pending is empty, the crawl's sole termination
    /// condition.
    pub fn pop_one(&mut self) -> StorageResult<Option<String>> {
        self.backend.pop_and_visit()
    }

    /// Inserts a URL into pending only if it is not already visited.
    /// Re-adding an already-pending URL is a set no-op.
    pub fn enqueue_if_new(&mut self, url: &str) -> StorageResult<()> {
        if !self.backend.contains(Register::Visited, url)? {
            self.backend.insert(Register::Pending, url)?;
        }
        Ok(())
    }

    /// Defensive cleanup of the pending register: removes entries that are
    /// already visited, and entries that no longer survive the link filter
    /// against the current site (stale state from earlier runs or bugs).
    pub fn reconcile(&mut self, site: &SiteBase, filter: &LinkFilter) -> StorageResult<()> {
        for url in self.backend.members(Register::Pending)? {
            if self.backend.contains(Register::Visited, &url)? {
                tracing::debug!("Reconcile: removing already-visited {}", url);
                self.backend.remove(Register::Pending, &url)?;
            } else if !filter.keeps(&url, site) {
                tracing::debug!("Reconcile: removing invalid {}", url);
                self.backend.remove(Register::Pending, &url)?;
            }
        }
        Ok(())
    }

    pub fn is_visited(&self, url: &str) -> StorageResult<bool> {
        self.backend.contains(Register::Visited, url)
    }

    pub fn pending_count(&self) -> StorageResult<u64> {
        self.backend.count(Register::Pending)
    }

    pub fn visited_count(&self) -> StorageResult<u64> {
        self.backend.count(Register::Visited)
    }
}
