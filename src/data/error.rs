use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input file into a [`RestaurantTable`](super::model::RestaurantTable).
///
/// Fatal at startup; when reloading from the UI the message is shown and the
/// current table is kept.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: '{value}' in column '{column}' is not a valid {expected}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),
}
