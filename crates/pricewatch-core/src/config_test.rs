use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.crawl.city, "moskva");
    assert_eq!(cfg.crawl.shops, DEFAULT_SHOPS.to_vec());
    assert_eq!(cfg.crawl.page_range, 100);
    assert!(!cfg.crawl.skip_errors);
    assert_eq!(cfg.base_url, "https://squark.edadeal.ru");
    assert_eq!(cfg.output_dir, PathBuf::from("data"));
    assert_eq!(cfg.user_agent, "pricewatch/0.1");
    assert!(cfg.request_timeout_secs.is_none());
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn build_app_config_reads_city_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_CITY", "spb");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.crawl.city, "spb");
}

#[test]
fn build_app_config_splits_shop_list() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_SHOPS", "5ka, dixy ,mgnl");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.crawl.shops, vec!["5ka", "dixy", "mgnl"]);
}

#[test]
fn build_app_config_rejects_blank_shop_entry() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_SHOPS", "5ka,,dixy");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(_))),
        "expected Validation, got: {result:?}"
    );
}

#[test]
fn build_app_config_prefers_shops_file_over_inline_list() {
    let path = std::env::temp_dir().join(format!("pricewatch-cfg-{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "shops:\n  - perekrestok\n").unwrap();
    let path_str = path.display().to_string();

    let mut map = HashMap::new();
    map.insert("PRICEWATCH_SHOPS_PATH", path_str.as_str());
    map.insert("PRICEWATCH_SHOPS", "5ka");
    let result = build_app_config(lookup_from_map(&map));
    std::fs::remove_file(&path).ok();

    assert_eq!(result.unwrap().crawl.shops, vec!["perekrestok"]);
}

#[test]
fn build_app_config_page_range_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_PAGE_RANGE", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.crawl.page_range, 3);
}

#[test]
fn build_app_config_page_range_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_PAGE_RANGE", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_PAGE_RANGE"),
        "expected InvalidEnvVar(PRICEWATCH_PAGE_RANGE), got: {result:?}"
    );
}

#[test]
fn build_app_config_page_range_zero_fails_validation() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_PAGE_RANGE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn build_app_config_skip_errors_accepts_common_spellings() {
    for (raw, expected) in [("true", true), ("1", true), ("YES", true), ("no", false)] {
        let mut map = HashMap::new();
        map.insert("PRICEWATCH_SKIP_ERRORS", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.crawl.skip_errors, expected, "raw value {raw:?}");
    }
}

#[test]
fn build_app_config_skip_errors_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_SKIP_ERRORS", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_SKIP_ERRORS")
    );
}

#[test]
fn build_app_config_request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_REQUEST_TIMEOUT_SECS", "45");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, Some(45));
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWATCH_REQUEST_TIMEOUT_SECS")
    );
}

#[test]
fn build_app_config_output_and_base_url_overrides() {
    let mut map = HashMap::new();
    map.insert("PRICEWATCH_OUTPUT_DIR", "/var/lib/pricewatch");
    map.insert("PRICEWATCH_BASE_URL", "http://127.0.0.1:8080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/var/lib/pricewatch"));
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
}

#[test]
fn parse_bool_rejects_unknown() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(" False "), Some(false));
}
