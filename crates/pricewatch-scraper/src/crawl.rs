//! Page loop for a single shop and the sequential multi-shop driver.
//!
//! Each shop is crawled from page 0 upward until one of:
//!
//! - HTTP 204 (end of results),
//! - an unexpected status with `skip_errors` enabled,
//! - `page_range` pages fetched.
//!
//! An unexpected status without `skip_errors`, a decode failure, or a
//! transport error aborts the whole crawl.

use chrono::NaiveDate;
use pricewatch_core::{CrawlConfig, ShopOffer};

use crate::client::{OffersClient, PageResponse};
use crate::error::ScraperError;
use crate::proto::decode_offers;

/// Why a shop crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStop {
    /// The first page came back empty (204).
    NoData,
    /// A later page came back empty (204).
    NoMoreProducts { page: u32 },
    /// An unexpected status was tolerated because `skip_errors` is on.
    SkippedError { page: u32, status: u16 },
    /// Every page in `page_range` returned offers.
    PageRangeExhausted { pages: u32 },
}

impl CrawlStop {
    /// One-line notice for the operator.
    #[must_use]
    pub fn notice(&self, shop: &str) -> String {
        match self {
            CrawlStop::NoData => format!("No data for {shop}"),
            CrawlStop::NoMoreProducts { .. } => format!("No more products in {shop}"),
            CrawlStop::SkippedError { status, .. } => format!("Unexpected code {status} for {shop}"),
            CrawlStop::PageRangeExhausted { pages } => {
                format!("Reached page limit of {pages} for {shop}")
            }
        }
    }
}

/// Offers collected for one shop, in page order.
#[derive(Debug, Clone)]
pub struct ShopCrawl {
    pub shop: String,
    pub offers: Vec<ShopOffer>,
    pub stop: CrawlStop,
}

/// Result of crawling every configured shop.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// All offers, shop-list order then page order.
    pub offers: Vec<ShopOffer>,
    /// Per-shop outcome, shop-list order.
    pub shops: Vec<ShopSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSummary {
    pub shop: String,
    pub records: usize,
    pub stop: CrawlStop,
}

/// Crawls pages `0..config.page_range` of `shop` and tags every offer with
/// city, shop, page and `processed_date`.
///
/// Emits exactly one notice (via `tracing`) describing how the crawl ended.
///
/// # Errors
///
/// - [`ScraperError::UnexpectedStatus`] — a status other than 200/204 while
///   `config.skip_errors` is off.
/// - [`ScraperError::Decode`] — a 200 body is not a valid `Offers` payload.
/// - [`ScraperError::Http`] — transport failure.
pub async fn crawl_shop(
    client: &OffersClient,
    config: &CrawlConfig,
    shop: &str,
    processed_date: NaiveDate,
) -> Result<ShopCrawl, ScraperError> {
    let city = config.city.as_str();
    let mut offers: Vec<ShopOffer> = Vec::new();

    for page in 0..config.page_range {
        match client.fetch_page(city, shop, page).await? {
            PageResponse::Offers(body) => {
                let decoded = decode_offers(&body).map_err(|source| ScraperError::Decode {
                    shop: shop.to_owned(),
                    page,
                    source,
                })?;
                tracing::debug!(shop, page, records = decoded.len(), "decoded offers page");

                offers.extend(decoded.into_iter().map(|offer| ShopOffer {
                    city: city.to_owned(),
                    shop: shop.to_owned(),
                    page,
                    processed_date,
                    offer,
                }));
            }
            PageResponse::NoContent => {
                let stop = if page == 0 {
                    CrawlStop::NoData
                } else {
                    CrawlStop::NoMoreProducts { page }
                };
                return Ok(finish(shop, offers, stop));
            }
            PageResponse::Unexpected(status) => {
                if config.skip_errors {
                    return Ok(finish(shop, offers, CrawlStop::SkippedError { page, status }));
                }
                return Err(ScraperError::UnexpectedStatus {
                    status,
                    shop: shop.to_owned(),
                });
            }
        }
    }

    let stop = CrawlStop::PageRangeExhausted {
        pages: config.page_range,
    };
    Ok(finish(shop, offers, stop))
}

fn finish(shop: &str, offers: Vec<ShopOffer>, stop: CrawlStop) -> ShopCrawl {
    let notice = stop.notice(shop);
    match stop {
        CrawlStop::SkippedError { page, status } => {
            tracing::warn!(shop, page, status, records = offers.len(), "{notice}");
        }
        _ => tracing::info!(shop, records = offers.len(), "{notice}"),
    }

    ShopCrawl {
        shop: shop.to_owned(),
        offers,
        stop,
    }
}

/// Crawls every shop in `config.shops`, one after another, and concatenates
/// their offers in list order.
///
/// # Errors
///
/// Propagates the first error from [`crawl_shop`]; offers collected for
/// earlier shops are dropped.
pub async fn crawl_shops(
    client: &OffersClient,
    config: &CrawlConfig,
    processed_date: NaiveDate,
) -> Result<CrawlReport, ScraperError> {
    let mut report = CrawlReport::default();
    let total = config.shops.len();

    for (index, shop) in config.shops.iter().enumerate() {
        tracing::info!(shop = %shop, city = %config.city, "crawling shop {}/{total}", index + 1);

        let crawl = crawl_shop(client, config, shop, processed_date).await?;
        report.shops.push(ShopSummary {
            records: crawl.offers.len(),
            shop: crawl.shop,
            stop: crawl.stop,
        });
        report.offers.extend(crawl.offers);
    }

    Ok(report)
}
