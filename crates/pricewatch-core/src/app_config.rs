use std::collections::HashSet;
use std::path::PathBuf;

use crate::ConfigError;

/// What to crawl and how to react to unexpected responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Locality filter sent as the `locality` query parameter.
    pub city: String,
    /// Shop identifiers, crawled in this order.
    pub shops: Vec<String>,
    /// Maximum number of pages fetched per shop.
    pub page_range: u32,
    /// Stop a shop early on an unexpected status instead of failing the run.
    pub skip_errors: bool,
}

impl CrawlConfig {
    /// Checks the invariants the crawler relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the city is blank, the shop list
    /// is empty or contains blank or duplicate identifiers, or `page_range`
    /// is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city.trim().is_empty() {
            return Err(ConfigError::Validation("city must be non-empty".to_string()));
        }

        if self.page_range == 0 {
            return Err(ConfigError::Validation(
                "page_range must be at least 1".to_string(),
            ));
        }

        validate_shop_list(&self.shops)
    }
}

pub(crate) fn validate_shop_list(shops: &[String]) -> Result<(), ConfigError> {
    if shops.is_empty() {
        return Err(ConfigError::Validation(
            "shop list must contain at least one shop".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for shop in shops {
        if shop.trim().is_empty() {
            return Err(ConfigError::Validation(
                "shop identifier must be non-empty".to_string(),
            ));
        }
        if !seen.insert(shop.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate shop identifier: '{shop}'"
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}
