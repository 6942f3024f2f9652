//! Content-addressed page file mirror
//!
//! In addition to the database, each fetched page can be written to a
//! directory as a standalone JSON file. The file name is a deterministic
//! hash of the URL, so repeated writes for the same URL land on the same
//! path and the first write wins.

use crate::storage::traits::StorageResult;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of per-URL JSON page files
#[derive(Debug, Clone)]
pub struct PageFiles {
    dir: PathBuf,
}

impl PageFiles {
    /// Opens (creating if needed) the page file directory
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The file path a URL maps to: hex SHA-256 of the URL, `.json` suffix
    pub fn path_for(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let name = hex::encode(hasher.finalize());
        self.dir.join(format!("{}.json", name))
    }

    /// Writes `{url: body}` as a JSON object, skipping if the file already
    /// exists. Returns true if a new file was written.
    pub fn write(&self, url: &str, body: &str) -> StorageResult<bool> {
        let path = self.path_for(url);
        if path.exists() {
            return Ok(false);
        }

        let record = json!({ url: body });
        fs::write(&path, serde_json::to_string(&record)?)?;
        Ok(true)
    }

    /// Removes every page file in the directory (start-fresh)
    pub fn clear(&self) -> StorageResult<()> {
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().map(|e| e == "json").unwrap_or(false) {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
