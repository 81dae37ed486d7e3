use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV snapshot: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected a JSON array or an object with a `transactions` array")]
    UnexpectedShape,
    #[error("unsupported snapshot format: {0} (expected .json or .csv)")]
    UnsupportedFormat(String),
}
