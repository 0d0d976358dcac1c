use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::validate_shop_list;
use crate::ConfigError;

pub const DEFAULT_CITY: &str = "moskva";

/// Retailers crawled when no shop list is configured.
pub const DEFAULT_SHOPS: [&str; 8] = [
    "5ka",
    "magnit-univer",
    "perekrestok",
    "dixy",
    "lenta-super",
    "vkusvill_offline",
    "mgnl",
    "azbuka_vkusa",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopsFile {
    pub shops: Vec<String>,
}

/// Load and validate a shop list from a YAML file of the form `shops: [..]`.
///
/// Identifiers are trimmed before validation.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_shops(path: &Path) -> Result<ShopsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ShopsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut shops_file: ShopsFile = serde_yaml::from_str(&content)?;
    shops_file.shops = shops_file
        .shops
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();

    validate_shop_list(&shops_file.shops)?;

    Ok(shops_file)
}
