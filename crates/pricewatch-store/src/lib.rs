//! Dated CSV output for a crawl run.
//!
//! One file per calendar day: `{dir}/prices_YYYY_MM_DD.csv`. Re-running on the
//! same day replaces the file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pricewatch_core::{Offer, ShopOffer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("output directory {path} does not exist")]
    MissingDirectory { path: String },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Output path for a run on `date`.
#[must_use]
pub fn output_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("prices_{}.csv", date.format("%Y_%m_%d")))
}

/// Header row: typed offer columns, then every extension key seen in `rows`
/// (sorted), then the collection metadata columns.
#[must_use]
pub fn header(rows: &[ShopOffer]) -> Vec<String> {
    let extra_keys = extra_columns(rows);

    Offer::COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(extra_keys)
        .chain(ShopOffer::METADATA_COLUMNS.iter().map(|c| (*c).to_string()))
        .collect()
}

fn extra_columns(rows: &[ShopOffer]) -> BTreeSet<String> {
    rows.iter()
        .flat_map(|row| row.offer.extra.keys().cloned())
        .collect()
}

/// Writes `rows` to [`output_path`] for `date`, overwriting any existing file.
///
/// `dir` must already exist. Rows are written in the order given.
///
/// # Errors
///
/// - [`StoreError::MissingDirectory`] — `dir` is not an existing directory.
/// - [`StoreError::Csv`] — the file cannot be created or a record cannot be written.
/// - [`StoreError::Io`] — flushing the file fails.
pub fn write_prices_csv(
    dir: &Path,
    date: NaiveDate,
    rows: &[ShopOffer],
) -> Result<PathBuf, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::MissingDirectory {
            path: dir.display().to_string(),
        });
    }

    let path = output_path(dir, date);
    let path_str = path.display().to_string();
    let csv_err = |source: csv::Error| StoreError::Csv {
        path: path_str.clone(),
        source,
    };

    let extra_keys: Vec<String> = extra_columns(rows).into_iter().collect();
    let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
    writer.write_record(header(rows)).map_err(csv_err)?;

    for row in rows {
        let extras = extra_keys
            .iter()
            .map(|key| row.offer.extra.get(key).cloned().unwrap_or_default());
        let record: Vec<String> = row
            .offer
            .cells()
            .into_iter()
            .chain(extras)
            .chain(row.metadata_cells())
            .collect();
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| StoreError::Io {
        path: path_str.clone(),
        source,
    })?;

    tracing::info!(path = %path_str, rows = rows.len(), "wrote prices file");
    Ok(path)
}
