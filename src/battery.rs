use crate::error::SimError;

/// A grid-scale battery that absorbs curtailed energy and supplies it back.
///
/// `Battery` holds a fixed energy capacity and the energy currently stored.
/// Both charge and discharge operate over one-hour intervals, so an amount
/// passed in MW is numerically identical to the MWh it moves. State of
/// charge is mutated only through [`Battery::charge`] and
/// [`Battery::discharge`]; both saturate at the bounds so
/// `0 <= stored <= capacity` holds after every call.
#[derive(Debug, Clone)]
pub struct Battery {
    capacity_mwh: f64,
    stored_mwh: f64,
}

impl Battery {
    /// Creates an empty battery with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidCapacity`] if `capacity_mwh` is not
    /// strictly positive.
    pub fn new(capacity_mwh: f64) -> Result<Self, SimError> {
        if !(capacity_mwh > 0.0) {
            return Err(SimError::InvalidCapacity(capacity_mwh));
        }
        Ok(Self {
            capacity_mwh,
            stored_mwh: 0.0,
        })
    }

    /// Total energy capacity in MWh.
    pub fn capacity_mwh(&self) -> f64 {
        self.capacity_mwh
    }

    /// Energy currently stored in MWh.
    pub fn stored_mwh(&self) -> f64 {
        self.stored_mwh
    }

    /// Absorbs `amount_mwh` of energy over one hour, saturating at capacity.
    ///
    /// Energy above capacity is silently discarded; callers that need
    /// curtailment-of-curtailment accounting must track the overflow
    /// themselves.
    pub fn charge(&mut self, amount_mwh: f64) {
        debug_assert!(amount_mwh >= 0.0, "charge amount must be non-negative");
        self.stored_mwh = (self.stored_mwh + amount_mwh).min(self.capacity_mwh);
    }

    /// Supplies up to `requested_mwh` over one hour, returning the amount
    /// actually delivered.
    ///
    /// A request larger than the stored energy drains the battery and
    /// delivers nothing: `stored` goes to zero and the return value is
    /// `0.0`, not the remainder. This is a deliberate accounting policy:
    /// a partially depleted battery earns no revenue that hour, and
    /// changing it would change realized revenue for every run that drains
    /// mid-series (see DESIGN.md).
    pub fn discharge(&mut self, requested_mwh: f64) -> f64 {
        debug_assert!(requested_mwh >= 0.0, "discharge amount must be non-negative");
        if self.stored_mwh < requested_mwh {
            self.stored_mwh = 0.0;
            0.0
        } else {
            self.stored_mwh -= requested_mwh;
            requested_mwh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_battery_starts_empty() {
        let b = Battery::new(10.0).expect("positive capacity");
        assert_eq!(b.capacity_mwh(), 10.0);
        assert_eq!(b.stored_mwh(), 0.0);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            Battery::new(0.0),
            Err(SimError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn negative_capacity_rejected() {
        assert!(matches!(
            Battery::new(-5.0),
            Err(SimError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn nan_capacity_rejected() {
        assert!(matches!(
            Battery::new(f64::NAN),
            Err(SimError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn charge_saturates_at_capacity() {
        let mut b = Battery::new(10.0).expect("positive capacity");
        b.charge(11.0);
        assert_eq!(b.stored_mwh(), 10.0);
    }

    #[test]
    fn charge_accumulates_below_capacity() {
        let mut b = Battery::new(10.0).expect("positive capacity");
        b.charge(3.0);
        b.charge(4.0);
        assert_eq!(b.stored_mwh(), 7.0);
    }

    #[test]
    fn discharge_sufficient_returns_requested() {
        let mut b = Battery::new(10.0).expect("positive capacity");
        b.charge(5.0);
        let supplied = b.discharge(2.0);
        assert_eq!(supplied, 2.0);
        assert_eq!(b.stored_mwh(), 3.0);
    }

    #[test]
    fn discharge_exact_remainder_supplies_it() {
        let mut b = Battery::new(10.0).expect("positive capacity");
        b.charge(2.0);
        let supplied = b.discharge(2.0);
        assert_eq!(supplied, 2.0);
        assert_eq!(b.stored_mwh(), 0.0);
    }

    #[test]
    fn draining_discharge_empties_and_supplies_nothing() {
        let mut b = Battery::new(10.0).expect("positive capacity");
        b.charge(0.9);
        let supplied = b.discharge(1.0);
        assert_eq!(supplied, 0.0);
        assert_eq!(b.stored_mwh(), 0.0);
    }

    #[test]
    fn bounds_hold_across_arbitrary_call_sequence() {
        let mut b = Battery::new(4.0).expect("positive capacity");
        let amounts = [3.0, 6.0, 1.5, 0.0, 2.0, 7.0, 0.25];
        for (i, &a) in amounts.iter().enumerate() {
            if i % 2 == 0 {
                b.charge(a);
            } else {
                b.discharge(a);
            }
            assert!(b.stored_mwh() >= 0.0);
            assert!(b.stored_mwh() <= b.capacity_mwh());
        }
    }
}
