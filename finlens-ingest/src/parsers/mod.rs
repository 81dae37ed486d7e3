//! Snapshot parsers (JSON export, CSV) and extension-based dispatch.

mod csv_snapshot;
mod json_snapshot;

pub use csv_snapshot::parse_csv;
pub use json_snapshot::parse_json;

use finlens_core::Transaction;
use std::fs;
use std::path::Path;

use crate::error::IngestError;

/// Read a snapshot file, choosing the parser by extension.
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>, IngestError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let read = || {
        fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let txns = match ext.as_str() {
        "json" => parse_json(&read()?)?,
        "csv" => parse_csv(read()?.as_bytes())?,
        other => return Err(IngestError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(path = %path.display(), count = txns.len(), "loaded transactions");
    Ok(txns)
}

/// Give records without an id a positional one (`txn-1`, `txn-2`, ...).
pub(crate) fn fill_missing_ids(txns: &mut [Transaction]) {
    for (i, t) in txns.iter_mut().enumerate() {
        if t.id.trim().is_empty() {
            t.id = format!("txn-{}", i + 1);
        }
    }
}
