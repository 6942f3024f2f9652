//! Outbound identity rotation
//!
//! The crawler can rotate its outbound identity (proxy endpoint and
//! User-Agent header) to reduce its detection footprint. Proxies change
//! only every Nth request to bound list churn; the User-Agent is picked
//! per request.

mod proxy;
mod user_agent;

pub use proxy::ProxyList;
pub use user_agent::UserAgentPool;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the identity layer
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Proxy list exhausted: every candidate identity has failed")]
    Exhausted,

    #[error("Identity list not found at {0}")]
    MissingList(PathBuf),

    #[error("Identity list at {path} is empty")]
    EmptyList { path: PathBuf },

    #[error("Failed to read identity list: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse identity list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;
