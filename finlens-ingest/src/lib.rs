//! finlens-ingest: load transaction snapshots exported by the storage layer.
//!
//! Only file-level problems are errors. Individual records that are missing
//! fields or carry garbage values are still loaded; the core filters decide
//! whether they count.

pub mod error;
pub mod order;
pub mod parsers;

pub use error::IngestError;
pub use order::sort_newest_first;
pub use parsers::{load_transactions, parse_csv, parse_json};
