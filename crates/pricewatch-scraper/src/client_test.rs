use super::*;

fn client(base_url: &str) -> OffersClient {
    OffersClient::new(base_url, "pricewatch-test/0.1", None).unwrap()
}

#[test]
fn offers_url_has_fixed_query_order() {
    let url = client("https://squark.edadeal.ru")
        .offers_url("moskva", "5ka", 0)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://squark.edadeal.ru/web/search/offers?count=50&locality=moskva&page=0&retailer=5ka"
    );
}

#[test]
fn offers_url_strips_trailing_slash_from_base() {
    let url = client("https://squark.edadeal.ru/")
        .offers_url("moskva", "dixy", 12)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://squark.edadeal.ru/web/search/offers?count=50&locality=moskva&page=12&retailer=dixy"
    );
}

#[test]
fn offers_url_encodes_query_values() {
    let url = client("http://127.0.0.1:8080")
        .offers_url("nizhniy novgorod", "a&b", 1)
        .unwrap();
    assert_eq!(
        url.query(),
        Some("count=50&locality=nizhniy+novgorod&page=1&retailer=a%26b")
    );
}

#[test]
fn new_rejects_unparseable_base_url() {
    let result = OffersClient::new("not-a-url", "pricewatch-test/0.1", None);
    assert!(
        matches!(result, Err(ScraperError::InvalidBaseUrl { ref base_url, .. }) if base_url == "not-a-url"),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn new_accepts_timeout() {
    assert!(OffersClient::new("https://squark.edadeal.ru", "ua", Some(30)).is_ok());
}
