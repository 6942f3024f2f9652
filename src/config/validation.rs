use crate::config::types::{Config, CrawlerConfig, FilterConfig, IdentityConfig, StorageConfig};
use crate::ConfigError;

/// MIME type categories the filter knows about
const KNOWN_MEDIA_CATEGORIES: &[&str] = &["image", "audio", "video", "font"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_identity_config(&config.identity)?;
    validate_storage_config(&config.storage)?;
    validate_filter_config(&config.filter)?;
    Ok(())
}

/// Validates crawl loop settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.pause_ceiling_secs < config.pause_floor_secs {
        return Err(ConfigError::Validation(format!(
            "pause-ceiling-secs ({}) must be >= pause-floor-secs ({})",
            config.pause_ceiling_secs, config.pause_floor_secs
        )));
    }

    if config.break_interval < 1 {
        return Err(ConfigError::Validation(
            "break-interval must be >= 1".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 || config.fetch_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout-secs must be between 1 and 300, got {}",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// Validates identity settings
fn validate_identity_config(config: &IdentityConfig) -> Result<(), ConfigError> {
    if config.rotate_every < 1 {
        return Err(ConfigError::Validation(
            "rotate-every must be >= 1".to_string(),
        ));
    }

    if config.use_proxy && config.proxy_list_path.is_empty() {
        return Err(ConfigError::Validation(
            "proxy-list-path cannot be empty when use-proxy is set".to_string(),
        ));
    }

    Ok(())
}

/// Validates persistence settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if let Some(dir) = &config.pages_dir {
        if dir.is_empty() {
            return Err(ConfigError::Validation(
                "pages-dir cannot be empty; omit it to disable page files".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates filter settings
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for category in &config.excluded_media_types {
        if !KNOWN_MEDIA_CATEGORIES.contains(&category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown media category '{}'; known categories: {}",
                category,
                KNOWN_MEDIA_CATEGORIES.join(", ")
            )));
        }
    }
    Ok(())
}
