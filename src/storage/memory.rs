//! In-memory storage implementation
//!
//! Same contracts as the SQLite store with no durability. Used by tests
//! and available for throwaway crawls.

use crate::storage::traits::{FrontierBackend, PageSink, Register, StorageResult};
use std::collections::{HashMap, HashSet};

/// Process-local frontier and page store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pending: HashSet<String>,
    visited: HashSet<String>,
    pages: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, register: Register) -> &HashSet<String> {
        match register {
            Register::Pending => &self.pending,
            Register::Visited => &self.visited,
        }
    }

    fn set_mut(&mut self, register: Register) -> &mut HashSet<String> {
        match register {
            Register::Pending => &mut self.pending,
            Register::Visited => &mut self.visited,
        }
    }
}

impl FrontierBackend for MemoryStore {
    fn insert(&mut self, register: Register, url: &str) -> StorageResult<bool> {
        Ok(self.set_mut(register).insert(url.to_string()))
    }

    fn remove(&mut self, register: Register, url: &str) -> StorageResult<bool> {
        Ok(self.set_mut(register).remove(url))
    }

    fn contains(&self, register: Register, url: &str) -> StorageResult<bool> {
        Ok(self.set(register).contains(url))
    }

    fn members(&self, register: Register) -> StorageResult<Vec<String>> {
        Ok(self.set(register).iter().cloned().collect())
    }

    fn count(&self, register: Register) -> StorageResult<u64> {
        Ok(self.set(register).len() as u64)
    }

    fn pop_and_visit(&mut self) -> StorageResult<Option<String>> {
        let url = match self.pending.iter().next() {
            Some(u) => u.clone(),
            None => return Ok(None),
        };
        self.pending.remove(&url);
        self.visited.insert(url.clone());
        Ok(Some(url))
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.pending.clear();
        self.visited.clear();
        Ok(())
    }
}

impl PageSink for MemoryStore {
    fn store_page(&mut self, url: &str, body: &str) -> StorageResult<bool> {
        if self.pages.contains_key(url) {
            return Ok(false);
        }
        self.pages.insert(url.to_string(), body.to_string());
        Ok(true)
    }

    fn page_body(&self, url: &str) -> StorageResult<Option<String>> {
        Ok(self.pages.get(url).cloned())
    }

    fn page_count(&self) -> StorageResult<u64> {
        Ok(self.pages.len() as u64)
    }

    fn clear_pages(&mut self) -> StorageResult<()> {
        self.pages.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_and_visit_moves_url() {
        let mut s = MemoryStore::new();
        s.insert(Register::Pending, "http://x/a").unwrap();

        assert_eq!(s.pop_and_visit().unwrap(), Some("http://x/a".to_string()));
        assert!(!s.contains(Register::Pending, "http://x/a").unwrap());
        assert!(s.contains(Register::Visited, "http://x/a").unwrap());
        assert_eq!(s.pop_and_visit().unwrap(), None);
    }

    #[test]
    fn test_page_first_write_wins() {
        let mut s = MemoryStore::new();
        assert!(s.store_page("http://x/a", "body1").unwrap());
        assert!(!s.store_page("http://x/a", "body2").unwrap());
        assert_eq!(s.page_body("http://x/a").unwrap(), Some("body1".to_string()));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut s = MemoryStore::new();
        assert!(s.insert(Register::Pending, "http://x/a").unwrap());
        assert!(!s.insert(Register::Pending, "http://x/a").unwrap());
        assert_eq!(s.count(Register::Pending).unwrap(), 1);
    }
}
