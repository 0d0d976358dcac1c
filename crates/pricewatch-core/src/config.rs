use std::path::{Path, PathBuf};

use crate::app_config::{AppConfig, CrawlConfig};
use crate::shops::{load_shops, DEFAULT_CITY, DEFAULT_SHOPS};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://squark.edadeal.ru";
pub const DEFAULT_PAGE_RANGE: u32 = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the shop list fails validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the shop list fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; with an empty environment the result crawls
/// [`DEFAULT_SHOPS`] in [`DEFAULT_CITY`] across [`DEFAULT_PAGE_RANGE`] pages.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let city = or_default("PRICEWATCH_CITY", DEFAULT_CITY).trim().to_string();

    let shops = match lookup("PRICEWATCH_SHOPS_PATH") {
        Ok(path) => load_shops(Path::new(&path))?.shops,
        Err(_) => match lookup("PRICEWATCH_SHOPS") {
            Ok(raw) => parse_shop_list(&raw),
            Err(_) => DEFAULT_SHOPS.iter().map(|s| (*s).to_string()).collect(),
        },
    };

    let page_range = or_default("PRICEWATCH_PAGE_RANGE", &DEFAULT_PAGE_RANGE.to_string())
        .parse::<u32>()
        .map_err(|e| invalid("PRICEWATCH_PAGE_RANGE", e.to_string()))?;

    let skip_errors = parse_bool(&or_default("PRICEWATCH_SKIP_ERRORS", "false"))
        .ok_or_else(|| invalid("PRICEWATCH_SKIP_ERRORS", "expected a boolean".to_string()))?;

    let base_url = or_default("PRICEWATCH_BASE_URL", DEFAULT_BASE_URL);
    let output_dir = PathBuf::from(or_default("PRICEWATCH_OUTPUT_DIR", "data"));
    let user_agent = or_default("PRICEWATCH_USER_AGENT", "pricewatch/0.1");
    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");

    let request_timeout_secs = match lookup("PRICEWATCH_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("PRICEWATCH_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let crawl = CrawlConfig {
        city,
        shops,
        page_range,
        skip_errors,
    };
    crawl.validate()?;

    Ok(AppConfig {
        crawl,
        base_url,
        output_dir,
        user_agent,
        request_timeout_secs,
        log_level,
    })
}

/// Splits a comma-separated shop list, trimming whitespace around entries.
fn parse_shop_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
