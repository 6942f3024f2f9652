//! Configuration module for Burrow
//!
//! Loads, parses, and validates TOML configuration files. All settings
//! have defaults, so the config file is optional.

mod parser;
mod types;
mod validation;

pub use parser::{default_config, load_config};
pub use types::{Config, CrawlerConfig, FilterConfig, IdentityConfig, StorageConfig};
pub use validation::validate;
