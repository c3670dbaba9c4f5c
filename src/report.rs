//! Post-run revenue reporting: a pure reduction over the revenue trace.

use std::fmt;

use chrono::Datelike;

use crate::sim::TracePoint;

/// Width of the widest text bar in the report.
const BAR_WIDTH: usize = 40;

/// Realized revenue for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
}

/// Monthly revenue rollup plus the run total.
///
/// Computed post-hoc from the revenue trace so the report can never
/// disagree with the recorded per-step data.
#[derive(Debug, Clone)]
pub struct RevenueReport {
    pub monthly: Vec<MonthlyRevenue>,
    pub total: f64,
}

impl RevenueReport {
    /// Folds the (time-ordered) revenue trace into per-month sums.
    pub fn from_trace(trace: &[TracePoint]) -> Self {
        let mut monthly: Vec<MonthlyRevenue> = Vec::new();
        let mut total = 0.0;

        for point in trace {
            total += point.value;
            let year = point.timestamp.year();
            let month = point.timestamp.month();
            match monthly.last_mut() {
                Some(entry) if entry.year == year && entry.month == month => {
                    entry.revenue += point.value;
                }
                _ => monthly.push(MonthlyRevenue {
                    year,
                    month,
                    revenue: point.value,
                }),
            }
        }

        Self { monthly, total }
    }
}

impl fmt::Display for RevenueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Monthly Revenue ---")?;
        let peak = self
            .monthly
            .iter()
            .map(|m| m.revenue)
            .fold(0.0_f64, f64::max);
        for m in &self.monthly {
            let bar_len = if peak > 0.0 {
                ((m.revenue / peak) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                f,
                "{:04}-{:02}  ${:>12.2}  {}",
                m.year,
                m.month,
                m.revenue,
                "#".repeat(bar_len)
            )?;
        }
        write!(f, "Total revenue: ${:.2}", self.total)
    }
}
