use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;

/// Offers returned per results page. The aggregator caps `count` at this value.
pub const PAGE_SIZE: u32 = 50;

/// Classified response for one results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    /// HTTP 200 with the raw protobuf body.
    Offers(Vec<u8>),
    /// HTTP 204: the shop has no results at this page or beyond.
    NoContent,
    /// Any other status code.
    Unexpected(u16),
}

/// HTTP client for the aggregator's `/web/search/offers` endpoint.
///
/// Redirects are followed. Nothing is retried: a failed request surfaces
/// immediately as [`ScraperError::Http`].
pub struct OffersClient {
    client: Client,
    base_url: String,
}

impl OffersClient {
    /// Creates an `OffersClient` against `base_url` (scheme and host, e.g.
    /// `https://squark.edadeal.ru`).
    ///
    /// `timeout_secs` bounds each request when set; when `None` a request may
    /// block indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ScraperError> {
        Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches one results page for `shop` in `city`. `page` is zero-based.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] — network, TLS or body read failure.
    /// - [`ScraperError::InvalidBaseUrl`] — the request URL cannot be built.
    ///
    /// Non-200/204 statuses are not errors here; they come back as
    /// [`PageResponse::Unexpected`] so the caller can apply its own policy.
    pub async fn fetch_page(
        &self,
        city: &str,
        shop: &str,
        page: u32,
    ) -> Result<PageResponse, ScraperError> {
        let url = self.offers_url(city, shop, page)?;
        tracing::debug!(%url, shop, page, "requesting offers page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        match status {
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(PageResponse::Offers(body.to_vec()))
            }
            StatusCode::NO_CONTENT => Ok(PageResponse::NoContent),
            other => Ok(PageResponse::Unexpected(other.as_u16())),
        }
    }

    /// Builds `{base}/web/search/offers?count=50&locality=..&page=..&retailer=..`
    /// with URL-encoded query values.
    pub(crate) fn offers_url(&self, city: &str, shop: &str, page: u32) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&format!("{}/web/search/offers", self.base_url)).map_err(|e| {
            ScraperError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("count", &PAGE_SIZE.to_string())
            .append_pair("locality", city)
            .append_pair("page", &page.to_string())
            .append_pair("retailer", shop);
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
