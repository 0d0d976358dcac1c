use thiserror::Error;

use crate::proto::DecodeError;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode offers for shop {shop} page {page}: {source}")]
    Decode {
        shop: String,
        page: u32,
        #[source]
        source: DecodeError,
    },

    #[error("unexpected code {status} for {shop}")]
    UnexpectedStatus { status: u16, shop: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
