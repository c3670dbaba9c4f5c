//! Error taxonomy for dataset loading and simulation runs.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors surfaced by dataset construction and the dispatch simulation.
///
/// Duplicate timestamps are rejected when a [`crate::market::MarketDataset`]
/// is built, so a running simulation can only fail on a missing row. The
/// saturation behaviors of [`crate::battery::Battery`] are intentional and
/// never reported as errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Battery constructed with a non-positive capacity.
    #[error("battery capacity must be > 0 MWh, got {0}")]
    InvalidCapacity(f64),

    /// A requested timestamp has no matching row in the dataset.
    ///
    /// Fatal to the run: skipping would desynchronize the output traces
    /// from wall-clock time.
    #[error("no market row for timestamp {0}")]
    MissingTimestamp(NaiveDateTime),

    /// More than one row carries the same timestamp, which indicates an
    /// upstream join defect.
    #[error("duplicate market row for timestamp {0}")]
    AmbiguousTimestamp(NaiveDateTime),

    /// A timestamp field could not be parsed in any accepted format.
    #[error("unparseable timestamp {raw:?}")]
    Timestamp { raw: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
