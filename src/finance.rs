//! Investment-tax-credit arithmetic. Not part of the dispatch core.

/// Flat federal investment tax credit rate.
pub const ITC_RATE: f64 = 0.06;

/// Predictor for the total installed cost of a storage system.
///
/// The prediction itself (market data, learned model, vendor quote) is a
/// collaborator concern; only the credit arithmetic lives here.
pub trait InstalledCostModel {
    /// Predicted total installation cost in dollars.
    fn predict_total_cost(&self, wattage_mw: f64, duration_hr: f64, year: i32) -> f64;
}

/// Simple $/MWh-of-storage cost model with a yearly decline factor.
#[derive(Debug, Clone)]
pub struct LinearCostModel {
    /// Cost per MWh of storage capacity in the reference year ($).
    pub cost_per_mwh: f64,
    /// Reference year for `cost_per_mwh`.
    pub reference_year: i32,
    /// Multiplicative cost decline per year after the reference year.
    pub annual_decline: f64,
}

impl InstalledCostModel for LinearCostModel {
    fn predict_total_cost(&self, wattage_mw: f64, duration_hr: f64, year: i32) -> f64 {
        let capacity_mwh = wattage_mw * duration_hr;
        let years = (year - self.reference_year).max(0);
        capacity_mwh * self.cost_per_mwh * (1.0 - self.annual_decline).powi(years)
    }
}

/// Credit value for a predicted installation: flat [`ITC_RATE`] of cost.
pub fn itc_from_prediction(
    model: &impl InstalledCostModel,
    wattage_mw: f64,
    duration_hr: f64,
    year: i32,
) -> f64 {
    model.predict_total_cost(wattage_mw, duration_hr, year) * ITC_RATE
}
