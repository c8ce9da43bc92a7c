//! Precomputed data of a recombining, possibly non-uniform, trinomial tree.

use ql_core::{ensure, errors::Result, DiscountFactor, Probability, Rate, Real, Time, Volatility};

use super::option_function::layer_states;
use super::LatticeSpecification;

/// Per-layer state values, transition probabilities and discount factors of
/// a recombining trinomial tree with `n` steps.
///
/// * `state_values[i]` holds the `2i + 1` underlying levels of layer `i`
///   (`n + 1` layers).
/// * `transition_probabilities[i][j]` holds the `(down, middle, up)`
///   probabilities from node `j` of layer `i` (`n` layers).
/// * `discount_factors[i]` discounts from layer `i + 1` to layer `i`.
/// * `times[i]` is the time of layer `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecombiningTrinomialTreeData {
    state_values: Vec<Vec<Real>>,
    transition_probabilities: Vec<Vec<[Probability; 3]>>,
    discount_factors: Vec<DiscountFactor>,
    times: Vec<Time>,
}

impl RecombiningTrinomialTreeData {
    /// Create tree data, checking that every layer has the recombining
    /// shape.
    pub fn new(
        state_values: Vec<Vec<Real>>,
        transition_probabilities: Vec<Vec<[Probability; 3]>>,
        discount_factors: Vec<DiscountFactor>,
        times: Vec<Time>,
    ) -> Result<Self> {
        let n = transition_probabilities.len();
        ensure!(
            state_values.len() == n + 1,
            "expected {} state layers, got {}",
            n + 1,
            state_values.len()
        );
        ensure!(
            discount_factors.len() == n,
            "expected {n} discount factors, got {}",
            discount_factors.len()
        );
        ensure!(
            times.len() == n + 1,
            "expected {} times, got {}",
            n + 1,
            times.len()
        );
        for (i, layer) in state_values.iter().enumerate() {
            ensure!(
                layer.len() == 2 * i + 1,
                "state layer {i} has {} nodes, expected {}",
                layer.len(),
                2 * i + 1
            );
        }
        for (i, layer) in transition_probabilities.iter().enumerate() {
            ensure!(
                layer.len() == 2 * i + 1,
                "probability layer {i} has {} nodes, expected {}",
                layer.len(),
                2 * i + 1
            );
        }
        Ok(Self {
            state_values,
            transition_probabilities,
            discount_factors,
            times,
        })
    }

    /// Build the data of a uniform lattice from a lattice specification and
    /// constant market inputs.
    pub fn uniform<L: LatticeSpecification + ?Sized>(
        lattice: &L,
        spot: Real,
        volatility: Volatility,
        interest_rate: Rate,
        dividend_rate: Rate,
        time_to_expiry: Time,
        steps: usize,
    ) -> Result<Self> {
        ensure!(steps > 0, "number of steps must be positive");
        let dt = time_to_expiry / steps as Real;
        let params =
            lattice.parameters_trinomial(volatility, interest_rate - dividend_rate, dt);
        params.validate(None)?;
        let discount = (-interest_rate * dt).exp();

        let state_values = (0..=steps)
            .map(|i| layer_states(spot, params.down_factor, params.middle_factor, i))
            .collect();
        let transition_probabilities = (0..steps)
            .map(|i| vec![params.probabilities(); 2 * i + 1])
            .collect();
        let times = (0..=steps).map(|i| i as Real * dt).collect();
        Self::new(
            state_values,
            transition_probabilities,
            vec![discount; steps],
            times,
        )
    }

    /// Number of time steps.
    pub fn number_of_steps(&self) -> usize {
        self.transition_probabilities.len()
    }

    /// Underlying levels of layer `i`.
    pub fn state_value_at_layer(&self, i: usize) -> &[Real] {
        &self.state_values[i]
    }

    /// Transition probabilities `(down, middle, up)` out of layer `i`.
    pub fn probability_at_layer(&self, i: usize) -> &[[Probability; 3]] {
        &self.transition_probabilities[i]
    }

    /// Discount factor from layer `i + 1` back to layer `i`.
    pub fn discount_factor_at_layer(&self, i: usize) -> DiscountFactor {
        self.discount_factors[i]
    }

    /// Time of layer `i`.
    pub fn time(&self, i: usize) -> Time {
        self.times[i]
    }

    /// All layer times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::CoxRossRubinsteinLatticeSpecification;

    #[test]
    fn uniform_tree_has_recombining_shape() {
        let data = RecombiningTrinomialTreeData::uniform(
            &CoxRossRubinsteinLatticeSpecification,
            100.0,
            0.2,
            0.05,
            0.0,
            1.0,
            4,
        )
        .unwrap();
        assert_eq!(data.number_of_steps(), 4);
        for i in 0..=4 {
            assert_eq!(data.state_value_at_layer(i).len(), 2 * i + 1);
        }
        assert_eq!(data.probability_at_layer(3).len(), 7);
        assert!((data.time(4) - 1.0).abs() < 1e-15);
        assert!((data.discount_factor_at_layer(0) - (-0.05_f64 * 0.25).exp()).abs() < 1e-15);
        assert_eq!(data.state_value_at_layer(0), &[100.0]);
    }

    #[test]
    fn ragged_layers_are_rejected() {
        let bad_states = vec![vec![100.0], vec![90.0, 100.0]];
        let probs = vec![vec![[0.25, 0.5, 0.25]]];
        assert!(
            RecombiningTrinomialTreeData::new(bad_states, probs.clone(), vec![0.99], vec![0.0, 1.0])
                .is_err()
        );

        let states = vec![vec![100.0], vec![90.0, 100.0, 110.0]];
        assert!(
            RecombiningTrinomialTreeData::new(states.clone(), probs.clone(), vec![], vec![0.0, 1.0])
                .is_err()
        );
        assert!(RecombiningTrinomialTreeData::new(states, probs, vec![0.99], vec![0.0, 1.0]).is_ok());
    }
}
