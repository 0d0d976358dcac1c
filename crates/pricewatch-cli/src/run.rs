//! One collection run: crawl every configured shop, then write the prices file.
//!
//! Nothing is written unless every shop finishes; a fatal crawl error
//! discards the offers collected so far.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use pricewatch_core::AppConfig;
use pricewatch_scraper::{crawl_shops, OffersClient, ShopSummary};
use pricewatch_store::{output_path, write_prices_csv};

pub(crate) struct RunSummary {
    pub path: PathBuf,
    pub offers: usize,
    pub shops: Vec<ShopSummary>,
}

impl RunSummary {
    /// Stdout report: one notice per shop, in crawl order, then the total.
    pub(crate) fn report_lines(&self) -> Vec<String> {
        self.shops
            .iter()
            .map(|s| format!("{} ({} offers)", s.stop.notice(&s.shop), s.records))
            .chain(std::iter::once(format!(
                "wrote {} offers from {} shops to {}",
                self.offers,
                self.shops.len(),
                self.path.display()
            )))
            .collect()
    }
}

pub(crate) async fn run_collection(
    config: &AppConfig,
    run_date: NaiveDate,
) -> anyhow::Result<RunSummary> {
    let client = OffersClient::new(
        &config.base_url,
        &config.user_agent,
        config.request_timeout_secs,
    )
    .context("failed to build offers client")?;

    tracing::info!(
        city = %config.crawl.city,
        shops = config.crawl.shops.len(),
        page_range = config.crawl.page_range,
        skip_errors = config.crawl.skip_errors,
        "starting collection run"
    );

    let report = crawl_shops(&client, &config.crawl, run_date)
        .await
        .with_context(|| format!("crawl for {} aborted", config.crawl.city))?;

    let path = write_prices_csv(&config.output_dir, run_date, &report.offers)
        .context("failed to write prices file")?;

    Ok(RunSummary {
        path,
        offers: report.offers.len(),
        shops: report.shops,
    })
}

pub(crate) fn describe_plan(config: &AppConfig, run_date: NaiveDate) -> String {
    format!(
        "dry-run: would crawl up to {} pages for {} shops in {}: [{}] and write {}",
        config.crawl.page_range,
        config.crawl.shops.len(),
        config.crawl.city,
        config.crawl.shops.join(", "),
        output_path(&config.output_dir, run_date).display()
    )
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
