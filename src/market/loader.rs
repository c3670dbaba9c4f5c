//! CSV ingestion: two per-hour series joined on exact timestamp equality.
//!
//! The grid series carries system-wide demand, supply, and the real-time
//! nodal price; the site series carries the curtailment available at the
//! simulated site. Rows join on exact timestamp equality (an inner join;
//! hours present in only one file are dropped). Vendor exports with other
//! column names should be renamed to this schema upstream.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::SimError;
use crate::market::record::{HourlyRecord, MarketDataset};

/// Accepted timestamp formats, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Deserialize)]
struct GridRow {
    timestamp: String,
    demand_mw: f64,
    supply_mw: f64,
    price_per_mwh: f64,
}

#[derive(Debug, Deserialize)]
struct SiteRow {
    timestamp: String,
    curtailment_mwh: f64,
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, SimError> {
    let trimmed = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    Err(SimError::Timestamp {
        raw: raw.to_string(),
    })
}

/// Loads and joins the grid and site CSV files into a [`MarketDataset`].
///
/// # Errors
///
/// Fails on unreadable files, malformed CSV, unparseable timestamps, or a
/// duplicate timestamp within either file
/// ([`SimError::AmbiguousTimestamp`]).
pub fn load_joined(grid_path: &Path, site_path: &Path) -> Result<MarketDataset, SimError> {
    join_readers(File::open(grid_path)?, File::open(site_path)?)
}

/// Joins grid and site series from any pair of readers.
pub fn join_readers(grid: impl Read, site: impl Read) -> Result<MarketDataset, SimError> {
    let mut grid_rows: BTreeMap<NaiveDateTime, GridRow> = BTreeMap::new();
    let mut reader = csv::Reader::from_reader(grid);
    for result in reader.deserialize() {
        let row: GridRow = result?;
        let ts = parse_timestamp(&row.timestamp)?;
        match grid_rows.entry(ts) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(_) => return Err(SimError::AmbiguousTimestamp(ts)),
        }
    }

    let mut records = Vec::new();
    let mut seen_site: BTreeMap<NaiveDateTime, ()> = BTreeMap::new();
    let mut reader = csv::Reader::from_reader(site);
    for result in reader.deserialize() {
        let row: SiteRow = result?;
        let ts = parse_timestamp(&row.timestamp)?;
        match seen_site.entry(ts) {
            Entry::Vacant(slot) => {
                slot.insert(());
            }
            Entry::Occupied(_) => return Err(SimError::AmbiguousTimestamp(ts)),
        }
        if let Some(grid_row) = grid_rows.get(&ts) {
            records.push(HourlyRecord {
                timestamp: ts,
                curtailment_mwh: row.curtailment_mwh,
                demand_mw: grid_row.demand_mw,
                supply_mw: grid_row.supply_mw,
                price_per_mwh: grid_row.price_per_mwh,
            });
        }
    }

    MarketDataset::from_records(records)
}
