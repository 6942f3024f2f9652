//! Proxy list management and rotation
//!
//! Candidate proxies are `host:port` strings loaded once at start from a
//! JSON file. A new proxy is picked at random only every `rotate_every`th
//! request; in between, the held proxy is reused. A proxy blamed for a
//! request failure is permanently removed and the shrunken list is written
//! back to disk.

use crate::identity::{IdentityError, IdentityResult};
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};

/// Rotating list of candidate proxy endpoints
#[derive(Debug)]
pub struct ProxyList {
    path: PathBuf,
    proxies: Vec<String>,
    rotate_every: u64,
    current: Option<String>,
}

impl ProxyList {
    /// Loads the proxy list from a JSON array file
    ///
    /// A missing or empty file is an error: harvesting fresh proxies is
    /// out of scope, so there is nothing to fall back to.
    pub fn load(path: &Path, rotate_every: u64) -> IdentityResult<Self> {
        if !path.exists() {
            return Err(IdentityError::MissingList(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let proxies: Vec<String> = serde_json::from_str(&content)?;

        if proxies.is_empty() {
            return Err(IdentityError::EmptyList {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            proxies,
            rotate_every: rotate_every.max(1),
            current: None,
        })
    }

    /// List constructor for tests and embedded use
    pub fn from_vec(proxies: Vec<String>, path: &Path, rotate_every: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            proxies,
            rotate_every: rotate_every.max(1),
            current: None,
        }
    }

    /// Returns the proxy to use for the request with this sequence number
    ///
    /// A new random proxy is selected when `request_count` is a multiple
    /// of the rotation interval (or when none is held yet); otherwise the
    /// held proxy is returned unchanged.
    pub fn next(&mut self, request_count: u64) -> IdentityResult<String> {
        if self.proxies.is_empty() {
            return Err(IdentityError::Exhausted);
        }

        if self.current.is_none() || request_count % self.rotate_every == 0 {
            let pick = self
                .proxies
                .choose(&mut rand::thread_rng())
                .ok_or(IdentityError::Exhausted)?
                .clone();
            self.current = Some(pick);
        }

        match &self.current {
            Some(proxy) => Ok(proxy.clone()),
            None => Err(IdentityError::Exhausted),
        }
    }

    /// Permanently removes the held proxy after a failure attributed to it
    /// and persists the updated candidate list.
    pub fn discard_current(&mut self) -> IdentityResult<()> {
        if let Some(failed) = self.current.take() {
            tracing::warn!("Discarding failed proxy {}", failed);
            self.proxies.retain(|p| p != &failed);
            self.persist()?;
        }
        Ok(())
    }

    /// Number of remaining candidates
    pub fn remaining(&self) -> usize {
        self.proxies.len()
    }

    fn persist(&self) -> IdentityResult<()> {
        fs::write(&self.path, serde_json::to_string(&self.proxies)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn list_path(tmp: &TempDir) -> PathBuf {
        tmp.path().join("proxy_list.json")
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = ProxyList::load(&list_path(&tmp), 10);
        assert!(matches!(result, Err(IdentityError::MissingList(_))));
    }

    #[test]
    fn test_load_empty_list_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(list_path(&tmp), "[]").unwrap();
        let result = ProxyList::load(&list_path(&tmp), 10);
        assert!(matches!(result, Err(IdentityError::EmptyList { .. })));
    }

    #[test]
    fn test_load_json_array() {
        let tmp = TempDir::new().unwrap();
        fs::write(list_path(&tmp), r#"["10.0.0.1:8080", "10.0.0.2:3128"]"#).unwrap();
        let list = ProxyList::load(&list_path(&tmp), 10).unwrap();
        assert_eq!(list.remaining(), 2);
    }

    #[test]
    fn test_identity_held_between_rotation_points() {
        let tmp = TempDir::new().unwrap();
        let mut list = ProxyList::from_vec(
            vec!["10.0.0.1:8080".to_string(), "10.0.0.2:3128".to_string()],
            &list_path(&tmp),
            10,
        );

        let first = list.next(0).unwrap();
        for count in 1..10 {
            assert_eq!(list.next(count).unwrap(), first);
        }
    }

    #[test]
    fn test_rotation_point_repicks() {
        let tmp = TempDir::new().unwrap();
        let mut list = ProxyList::from_vec(
            vec!["10.0.0.1:8080".to_string()],
            &list_path(&tmp),
            10,
        );

        // With a single candidate the pick is deterministic; the point is
        // that the rotation call succeeds and still returns a member.
        let first = list.next(0).unwrap();
        let rotated = list.next(10).unwrap();
        assert_eq!(first, rotated);
        assert_eq!(rotated, "10.0.0.1:8080");
    }

    #[test]
    fn test_discard_removes_and_persists() {
        let tmp = TempDir::new().unwrap();
        fs::write(list_path(&tmp), r#"["10.0.0.1:8080", "10.0.0.2:3128"]"#).unwrap();
        let mut list = ProxyList::load(&list_path(&tmp), 10).unwrap();

        list.next(0).unwrap();
        list.discard_current().unwrap();
        assert_eq!(list.remaining(), 1);

        let on_disk: Vec<String> =
            serde_json::from_str(&fs::read_to_string(list_path(&tmp)).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_exhausted_after_all_discarded() {
        let tmp = TempDir::new().unwrap();
        let mut list = ProxyList::from_vec(
            vec!["10.0.0.1:8080".to_string()],
            &list_path(&tmp),
            10,
        );

        list.next(0).unwrap();
        list.discard_current().unwrap();
        assert!(matches!(list.next(1), Err(IdentityError::Exhausted)));
    }
}
