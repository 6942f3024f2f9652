//! User-Agent pool
//!
//! A different User-Agent header is sent with every request, drawn at
//! random from a JSON list file or from a small built-in set.

use crate::identity::{IdentityError, IdentityResult};
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

/// Fallback agent if the pool somehow ends up empty
const FALLBACK_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Built-in browser User-Agent strings used when no list file is given
const DEFAULT_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
];

/// Pool of User-Agent strings, one picked at random per request
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Loads agents from a JSON array file
    pub fn load(path: &Path) -> IdentityResult<Self> {
        if !path.exists() {
            return Err(IdentityError::MissingList(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let agents: Vec<String> = serde_json::from_str(&content)?;

        if agents.is_empty() {
            return Err(IdentityError::EmptyList {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { agents })
    }

    /// Picks a random agent from the pool
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(|s| s.as_str())
            .unwrap_or(FALLBACK_AGENT)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: DEFAULT_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
