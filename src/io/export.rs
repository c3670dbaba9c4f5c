//! CSV export for the co-indexed revenue and state-of-charge traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SimError;
use crate::sim::TracePoint;

/// Column header for trace export.
const HEADER: &str = "timestamp,revenue,soc_mwh";

/// Exports both traces side by side to a CSV file at `path`.
///
/// One row per timestep, deterministic output for identical inputs.
///
/// # Panics
///
/// Panics if the traces are not co-indexed (different lengths or
/// mismatched timestamps); the simulator never produces such a pair.
///
/// # Errors
///
/// Returns a [`SimError`] if file creation or writing fails.
pub fn export_traces(
    revenue: &[TracePoint],
    soc: &[TracePoint],
    path: &Path,
) -> Result<(), SimError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_traces(revenue, soc, buf)
}

/// Writes both traces as CSV to any writer.
pub fn write_traces(
    revenue: &[TracePoint],
    soc: &[TracePoint],
    writer: impl Write,
) -> Result<(), SimError> {
    assert_eq!(
        revenue.len(),
        soc.len(),
        "revenue and soc traces must be co-indexed"
    );

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(','))?;

    for (r, s) in revenue.iter().zip(soc.iter()) {
        assert_eq!(
            r.timestamp, s.timestamp,
            "revenue and soc traces must share timestamps pairwise"
        );
        wtr.write_record(&[
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.4}", r.value),
            format!("{:.4}", s.value),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
