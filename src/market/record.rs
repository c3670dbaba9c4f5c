use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDateTime;

use crate::error::SimError;

/// One joined hour of market conditions at the simulated site.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Hour this row describes (interval ending, local time).
    pub timestamp: NaiveDateTime,
    /// Curtailed renewable energy available to absorb this hour (MWh, >= 0).
    pub curtailment_mwh: f64,
    /// Forecast system demand (MW). Used only relative to `supply_mw`.
    pub demand_mw: f64,
    /// Total system generation (MW).
    pub supply_mw: f64,
    /// Real-time nodal price ($/MWh, any sign).
    pub price_per_mwh: f64,
}

/// An ordered, unique-key market time series.
///
/// Rows are indexed by their timestamp once at build time, so each
/// simulation step is a direct key lookup and duplicate keys are caught
/// here rather than mid-run. The dataset is read-only after construction;
/// the simulator borrows it and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct MarketDataset {
    rows: BTreeMap<NaiveDateTime, HourlyRecord>,
}

impl MarketDataset {
    /// Builds a dataset from an iterator of rows.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AmbiguousTimestamp`] if two rows share a
    /// timestamp. An upstream join should already have deduplicated;
    /// failing fast here beats silently picking one row.
    pub fn from_records(
        records: impl IntoIterator<Item = HourlyRecord>,
    ) -> Result<Self, SimError> {
        let mut rows = BTreeMap::new();
        for record in records {
            match rows.entry(record.timestamp) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    return Err(SimError::AmbiguousTimestamp(record.timestamp));
                }
            }
        }
        Ok(Self { rows })
    }

    /// Looks up the unique row for `timestamp`, if present.
    pub fn get(&self, timestamp: NaiveDateTime) -> Option<&HourlyRecord> {
        self.rows.get(&timestamp)
    }

    /// All timestamps in ascending order.
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.rows.keys().copied()
    }

    /// All rows in ascending timestamp order.
    pub fn records(&self) -> impl Iterator<Item = &HourlyRecord> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
