pub mod client;
pub mod crawl;
pub mod error;
pub mod proto;

pub use client::{OffersClient, PageResponse, PAGE_SIZE};
pub use crawl::{crawl_shop, crawl_shops, CrawlReport, CrawlStop, ShopCrawl, ShopSummary};
pub use error::ScraperError;
pub use proto::{decode_offers, DecodeError, OfferMessage, OffersMessage};
