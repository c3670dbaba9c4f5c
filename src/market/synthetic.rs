use std::f64::consts::PI;

use chrono::{NaiveDateTime, TimeDelta};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::market::record::{HourlyRecord, MarketDataset};

/// Seeded generator for a synthetic hourly market series.
///
/// Demand and supply follow daily sinusoids with Gaussian-ish noise;
/// curtailment appears in overnight hours when generation runs ahead of
/// demand, and the price tracks the demand–supply gap around a base level.
/// Output is deterministic for a given seed, which is what the demo preset
/// and the integration tests rely on.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    /// Number of hourly rows to generate.
    pub hours: usize,
    /// Timestamp of the first row; subsequent rows step by one hour.
    pub start: NaiveDateTime,
    /// Random seed.
    pub seed: u64,
    /// Mean system demand (MW).
    pub base_demand_mw: f64,
    /// Amplitude of the daily demand swing (MW).
    pub demand_amp_mw: f64,
    /// Mean system supply (MW).
    pub base_supply_mw: f64,
    /// Amplitude of the daily supply swing (MW).
    pub supply_amp_mw: f64,
    /// Noise standard deviation applied to demand and supply (MW).
    pub noise_std_mw: f64,
    /// Cap on per-hour curtailment (MWh).
    pub curtailment_cap_mwh: f64,
    /// Price level when demand and supply balance ($/MWh).
    pub base_price_per_mwh: f64,
}

impl SyntheticMarket {
    /// Generates the full hourly dataset.
    pub fn generate(&self) -> MarketDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::with_capacity(self.hours);

        for h in 0..self.hours {
            let timestamp = self.start + TimeDelta::hours(h as i64);
            let day_pos = (h % 24) as f64 / 24.0;

            // Demand peaks in the afternoon, supply peaks around midday.
            let demand_mw = (self.base_demand_mw
                + self.demand_amp_mw * (2.0 * PI * day_pos - 0.75 * PI).sin()
                + gaussian(&mut rng, self.noise_std_mw))
            .max(0.0);
            let supply_mw = (self.base_supply_mw
                + self.supply_amp_mw * (2.0 * PI * day_pos - 0.5 * PI).sin()
                + gaussian(&mut rng, self.noise_std_mw))
            .max(0.0);

            // Overnight surplus spills as curtailment at the site.
            let hour_of_day = h % 24;
            let surplus_mw = supply_mw - demand_mw;
            let curtailment_mwh = if hour_of_day < 6 && surplus_mw > 0.0 {
                (surplus_mw * 0.25).min(self.curtailment_cap_mwh)
            } else {
                0.0
            };

            let price_per_mwh = self.base_price_per_mwh + 0.5 * (demand_mw - supply_mw)
                + gaussian(&mut rng, 1.0);

            records.push(HourlyRecord {
                timestamp,
                curtailment_mwh,
                demand_mw,
                supply_mw,
                price_per_mwh,
            });
        }

        MarketDataset::from_records(records).expect("generated timestamps step hourly and are unique")
    }
}

/// Gaussian-ish noise via Box-Muller, as in the device profile generators.
fn gaussian(rng: &mut StdRng, std: f64) -> f64 {
    if std <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std
}
