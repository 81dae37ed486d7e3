//! finlens-core: transaction model and the pure derivations built on it
//! (dashboard statistics, map markers, assistant context).

pub mod aggregate;
pub mod filter;
pub mod geo;
pub mod money;
pub mod period;
pub mod summary;
pub mod transaction;

pub use aggregate::{
    aggregate, aggregate_with, share_of, AggregateOptions, DerivedStatistics, PercentChange,
    PeriodTotals,
};
pub use geo::{
    is_valid_unit_offset, layout, layout_with, offset, GeoOptions, MarkerLayout, OffsetMarker,
    UNIT_OFFSET,
};
pub use money::format_money;
pub use period::YearMonth;
pub use summary::TransactionSummary;
pub use transaction::{GeoPoint, Location, Transaction, TransactionType};
