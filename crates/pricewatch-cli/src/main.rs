mod run;

use std::path::PathBuf;

use clap::Parser;
use pricewatch_core::{AppConfig, ConfigError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Collect edadeal offer prices for a city into a dated CSV file")]
struct Cli {
    /// Locality to crawl (overrides PRICEWATCH_CITY)
    #[arg(long)]
    city: Option<String>,

    /// Shop identifier to crawl; repeat for several (overrides the configured list)
    #[arg(long = "shop")]
    shops: Vec<String>,

    /// Maximum pages fetched per shop
    #[arg(long)]
    page_range: Option<u32>,

    /// Keep going with a partial shop when the API returns an unexpected status
    #[arg(long)]
    skip_errors: bool,

    /// Directory the prices file is written to; must already exist
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print what would be crawled and exit without making requests
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers command-line overrides on top of the env-derived config and
    /// re-validates the crawl settings.
    fn apply(self, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
        if let Some(city) = self.city {
            config.crawl.city = city.trim().to_string();
        }
        if !self.shops.is_empty() {
            config.crawl.shops = self.shops.iter().map(|s| s.trim().to_string()).collect();
        }
        if let Some(page_range) = self.page_range {
            config.crawl.page_range = page_range;
        }
        if self.skip_errors {
            config.crawl.skip_errors = true;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }

        config.crawl.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricewatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dry_run = cli.dry_run;
    let config = cli.apply(config)?;
    let run_date = chrono::Local::now().date_naive();

    if dry_run {
        println!("{}", run::describe_plan(&config, run_date));
        return Ok(());
    }

    let summary = run::run_collection(&config, run_date).await?;
    for line in summary.report_lines() {
        println!("{line}");
    }

    Ok(())
}
