use crate::market::HourlyRecord;

/// The single action taken for one timestep, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchAction {
    /// Absorb curtailed energy (MWh). Always wins over discharge: the
    /// battery cannot charge and discharge within one hour.
    Charge(f64),
    /// Grid supply already meets demand; nothing to serve, even at a
    /// favorable price.
    HoldSurplus,
    /// Unmet demand exists but the price is below the discharge threshold.
    HoldPriceFloor,
    /// Request a discharge of the configured unit rate (MWh).
    Discharge(f64),
}

/// Evaluates the dispatch ladder for one market row.
///
/// Exactly one branch fires:
/// 1. positive curtailment charges,
/// 2. `demand <= supply` holds,
/// 3. `price < discharge_price` holds,
/// 4. otherwise discharge `unit_discharge_mwh`.
///
/// The fixed unit rate is a configured simplification; it is not derived
/// from the demand gap or the price spread.
pub fn decide(
    row: &HourlyRecord,
    discharge_price: f64,
    unit_discharge_mwh: f64,
) -> DispatchAction {
    if row.curtailment_mwh > 0.0 {
        DispatchAction::Charge(row.curtailment_mwh)
    } else if row.demand_mw <= row.supply_mw {
        DispatchAction::HoldSurplus
    } else if row.price_per_mwh < discharge_price {
        DispatchAction::HoldPriceFloor
    } else {
        DispatchAction::Discharge(unit_discharge_mwh)
    }
}
