//! Per-layer data sources for backward induction.
//!
//! The induction loop only needs, for each layer, to turn the values of the
//! next layer into the values of this one, plus the expiry values and the
//! node levels of layer 1 for Greek extraction.  [`LatticeSource`]
//! abstracts over where that data comes from:
//!
//! * [`UniformLattice`] derives it lazily from constant market inputs and a
//!   set of [`LatticeParameters`];
//! * [`RecombiningTrinomialTreeData`] reads it from precomputed layers.

use ql_core::{DiscountFactor, Real, Time};

use super::{DividendSchedule, LatticeParameters, OptionFunction, RecombiningTrinomialTreeData};

/// A source of per-layer discount factors, probabilities and state values.
pub trait LatticeSource {
    /// Number of time steps.
    fn number_of_steps(&self) -> usize;

    /// Option values on the expiry layer.
    fn payoff_at_expiry<F: OptionFunction + ?Sized>(&self, function: &F) -> Vec<Real>;

    /// Option values on `layer` given the values on `layer + 1`.
    fn next_option_values<F: OptionFunction + ?Sized>(
        &self,
        function: &F,
        values: &[Real],
        layer: usize,
    ) -> Vec<Real>;

    /// Underlying levels `(down, middle, up)` of the three nodes of layer 1.
    fn layer_one_states(&self) -> Option<[Real; 3]>;
}

/// A uniform lattice built from constant market inputs.
///
/// Holds the root spot, the spot seeding the expiry layer (net of every
/// discrete dividend) and, when dividends are discrete, the schedule used to
/// adjust the spot seen by each induction step.
#[derive(Debug, Clone)]
pub struct UniformLattice<'a> {
    params: LatticeParameters,
    discount: DiscountFactor,
    dt: Time,
    steps: usize,
    spot: Real,
    expiry_spot: Real,
    schedule: Option<&'a DividendSchedule>,
}

impl<'a> UniformLattice<'a> {
    /// Assemble a uniform lattice.  `params` are expected to be validated.
    pub fn new(
        params: LatticeParameters,
        discount: DiscountFactor,
        dt: Time,
        steps: usize,
        spot: Real,
        schedule: Option<&'a DividendSchedule>,
    ) -> Self {
        let expiry_spot = schedule.map_or(spot, |s| spot * s.cumulative_multiplier());
        Self {
            params,
            discount,
            dt,
            steps,
            spot,
            expiry_spot,
            schedule,
        }
    }

    /// Lattice parameters.
    pub fn parameters(&self) -> &LatticeParameters {
        &self.params
    }

    /// One-step discount factor.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }

    /// Time step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Spot seeding the expiry layer.
    pub fn expiry_spot(&self) -> Real {
        self.expiry_spot
    }

    /// Spot seen by the update of `layer`: the root spot net of the
    /// dividends gone ex strictly before `layer · dt`.
    pub fn spot_at_layer(&self, layer: usize) -> Real {
        match self.schedule {
            Some(schedule) => self.spot * schedule.multiplier_before(layer as Real * self.dt),
            None => self.spot,
        }
    }
}

impl LatticeSource for UniformLattice<'_> {
    fn number_of_steps(&self) -> usize {
        self.steps
    }

    fn payoff_at_expiry<F: OptionFunction + ?Sized>(&self, function: &F) -> Vec<Real> {
        function.payoff_at_expiry_trinomial(
            self.expiry_spot,
            self.params.down_factor,
            self.params.middle_factor,
        )
    }

    fn next_option_values<F: OptionFunction + ?Sized>(
        &self,
        function: &F,
        values: &[Real],
        layer: usize,
    ) -> Vec<Real> {
        function.next_option_values(
            self.discount,
            &self.params,
            values,
            self.spot_at_layer(layer),
            layer,
        )
    }

    // No dividend is assumed to go ex on the first step.
    fn layer_one_states(&self) -> Option<[Real; 3]> {
        Some([
            self.spot * self.params.down_factor,
            self.spot,
            self.spot * self.params.up_factor,
        ])
    }
}

impl LatticeSource for RecombiningTrinomialTreeData {
    fn number_of_steps(&self) -> usize {
        RecombiningTrinomialTreeData::number_of_steps(self)
    }

    fn payoff_at_expiry<F: OptionFunction + ?Sized>(&self, function: &F) -> Vec<Real> {
        let n = RecombiningTrinomialTreeData::number_of_steps(self);
        function.payoff_at_expiry_from_states(self.state_value_at_layer(n))
    }

    fn next_option_values<F: OptionFunction + ?Sized>(
        &self,
        function: &F,
        values: &[Real],
        layer: usize,
    ) -> Vec<Real> {
        function.next_option_values_from_data(
            self.discount_factor_at_layer(layer),
            self.probability_at_layer(layer),
            self.state_value_at_layer(layer),
            values,
            layer,
        )
    }

    fn layer_one_states(&self) -> Option<[Real; 3]> {
        if RecombiningTrinomialTreeData::number_of_steps(self) < 1 {
            return None;
        }
        match *self.state_value_at_layer(1) {
            [s0, s1, s2] => Some([s0, s1, s2]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params() -> LatticeParameters {
        LatticeParameters::new(1.1, 1.0, 1.0 / 1.1, 0.3, 0.4, 0.3)
    }

    #[test]
    fn spot_without_schedule_is_constant() {
        let lattice = UniformLattice::new(params(), 0.99, 0.25, 4, 100.0, None);
        assert_eq!(lattice.expiry_spot(), 100.0);
        for layer in 0..4 {
            assert_eq!(lattice.spot_at_layer(layer), 100.0);
        }
    }

    #[test]
    fn discrete_dividends_adjust_spot_per_layer() {
        let schedule = DividendSchedule::new(vec![0.05], vec![0.5]).unwrap();
        let lattice = UniformLattice::new(params(), 0.99, 0.25, 4, 100.0, Some(&schedule));
        assert_abs_diff_eq!(lattice.expiry_spot(), 95.0, epsilon = 1e-12);
        assert_eq!(lattice.spot_at_layer(0), 100.0);
        assert_eq!(lattice.spot_at_layer(1), 100.0);
        // 2 · 0.25 is not strictly after the ex-date.
        assert_eq!(lattice.spot_at_layer(2), 100.0);
        assert_abs_diff_eq!(lattice.spot_at_layer(3), 95.0, epsilon = 1e-12);
    }

    #[test]
    fn layer_one_states_use_root_spot() {
        let lattice = UniformLattice::new(params(), 0.99, 0.25, 4, 100.0, None);
        let [s0, s1, s2] = lattice.layer_one_states().unwrap();
        assert_abs_diff_eq!(s0, 100.0 / 1.1, epsilon = 1e-12);
        assert_eq!(s1, 100.0);
        assert_abs_diff_eq!(s2, 110.0, epsilon = 1e-12);
    }
}
