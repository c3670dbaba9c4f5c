//! The stateful dispatch driver: lookup, decide, mutate, record.

use chrono::NaiveDateTime;

use crate::battery::Battery;
use crate::error::SimError;
use crate::market::MarketDataset;
use crate::sim::policy::{DispatchAction, decide};

/// Default fixed discharge request per hour (MWh).
pub const DEFAULT_UNIT_DISCHARGE_MWH: f64 = 1.0;

/// One point of an output trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Sequential dispatch simulator for one site and one battery.
///
/// Owns its [`Battery`] and the two output traces; borrows the market
/// dataset read-only. Each processed timestep mutates the battery at most
/// once and appends exactly one revenue point and one state-of-charge
/// point, so the traces stay co-indexed with each other and with the
/// replayed timestamps. State carries forward between steps, which is why
/// `run` replays strictly in ascending time order.
pub struct DispatchSimulator<'a> {
    site: String,
    data: &'a MarketDataset,
    discharge_price: f64,
    unit_discharge_mwh: f64,
    battery: Battery,
    revenue: Vec<TracePoint>,
    soc: Vec<TracePoint>,
}

impl<'a> DispatchSimulator<'a> {
    /// Creates a simulator with an empty battery of `capacity_mwh`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidCapacity`] for a non-positive capacity.
    pub fn new(
        site: impl Into<String>,
        capacity_mwh: f64,
        discharge_price: f64,
        data: &'a MarketDataset,
    ) -> Result<Self, SimError> {
        Ok(Self {
            site: site.into(),
            data,
            discharge_price,
            unit_discharge_mwh: DEFAULT_UNIT_DISCHARGE_MWH,
            battery: Battery::new(capacity_mwh)?,
            revenue: Vec::with_capacity(data.len()),
            soc: Vec::with_capacity(data.len()),
        })
    }

    /// Overrides the fixed per-hour discharge request.
    pub fn with_unit_discharge(mut self, unit_discharge_mwh: f64) -> Self {
        self.unit_discharge_mwh = unit_discharge_mwh;
        self
    }

    /// Site identifier this simulator was built for. Opaque label only.
    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Realized revenue per processed timestep, in replay order.
    pub fn revenue_trace(&self) -> &[TracePoint] {
        &self.revenue
    }

    /// Stored energy after each processed timestep, in replay order.
    pub fn soc_trace(&self) -> &[TracePoint] {
        &self.soc
    }

    /// Sum of the revenue trace.
    pub fn total_revenue(&self) -> f64 {
        self.revenue.iter().map(|p| p.value).sum()
    }

    /// Processes the single timestep `t`.
    ///
    /// Looks up the unique market row, evaluates the dispatch ladder, and
    /// records one revenue point and one SOC point. Once a branch fires
    /// the mutation and both appended points are final for this timestep;
    /// there is no rollback.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingTimestamp`] if the dataset has no row
    /// for `t`. Nothing is recorded in that case.
    pub fn step(&mut self, t: NaiveDateTime) -> Result<(), SimError> {
        let row = self.data.get(t).ok_or(SimError::MissingTimestamp(t))?;

        let revenue = match decide(row, self.discharge_price, self.unit_discharge_mwh) {
            DispatchAction::Charge(mwh) => {
                self.battery.charge(mwh);
                0.0
            }
            DispatchAction::HoldSurplus | DispatchAction::HoldPriceFloor => 0.0,
            DispatchAction::Discharge(mwh) => {
                let supplied = self.battery.discharge(mwh);
                supplied * row.price_per_mwh
            }
        };

        self.revenue.push(TracePoint {
            timestamp: t,
            value: revenue,
        });
        self.soc.push(TracePoint {
            timestamp: t,
            value: self.battery.stored_mwh(),
        });
        Ok(())
    }

    /// Replays every dataset timestamp exactly once in ascending order.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SimError`] from [`DispatchSimulator::step`];
    /// the run stops there rather than skipping the bad hour.
    pub fn run(&mut self) -> Result<(), SimError> {
        let data = self.data;
        for t in data.timestamps() {
            self.step(t)?;
        }
        Ok(())
    }
}
