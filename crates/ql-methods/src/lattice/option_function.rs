//! Option functions: payoff and one-step valuation rules on a trinomial
//! lattice.
//!
//! An [`OptionFunction`] tells the pricing engine how many steps to take,
//! what the option pays at expiry and how the value vector of one layer is
//! obtained from the next.  The update rules have default implementations
//! computing the plain discounted expectation, which is what a European
//! claim needs; early-exercise and knock-out features override them.
//!
//! Node `j` of layer `i` of a uniform lattice sits at
//! `spot · d^i · (m/d)^j` (see [`layer_states`]).

use ql_core::{ensure, errors::Result, DiscountFactor, Probability, Real, Time};

use super::LatticeParameters;

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Underlying levels of the `2·layer + 1` nodes of a uniform lattice layer,
/// from the lowest node upwards.
pub fn layer_states(spot: Real, down_factor: Real, middle_factor: Real, layer: usize) -> Vec<Real> {
    let ratio = middle_factor / down_factor;
    let mut level = spot * down_factor.powi(layer as i32);
    let mut states = Vec::with_capacity(2 * layer + 1);
    for _ in 0..=2 * layer {
        states.push(level);
        level *= ratio;
    }
    states
}

/// Discounted expectation of `values` under constant branch probabilities.
///
/// Returns one entry per consecutive `(down, middle, up)` triple, i.e. two
/// fewer entries than `values`.
pub fn discounted_expectation(
    discount: DiscountFactor,
    params: &LatticeParameters,
    values: &[Real],
) -> Vec<Real> {
    values
        .windows(3)
        .map(|w| {
            discount
                * (params.up_probability * w[2]
                    + params.middle_probability * w[1]
                    + params.down_probability * w[0])
        })
        .collect()
}

/// Discounted expectation of `values` under node-dependent probabilities
/// ordered `(down, middle, up)`.
pub fn discounted_expectation_per_node(
    discount: DiscountFactor,
    probabilities: &[[Probability; 3]],
    values: &[Real],
) -> Vec<Real> {
    values
        .windows(3)
        .zip(probabilities)
        .map(|(w, p)| discount * (p[2] * w[2] + p[1] * w[1] + p[0] * w[0]))
        .collect()
}

// ─── OptionFunction ───────────────────────────────────────────────────────────

/// Payoff and backward-induction rules of an option priced on a trinomial
/// lattice.
pub trait OptionFunction {
    /// Number of lattice steps between valuation and expiry.
    fn number_of_steps(&self) -> usize;

    /// Time to expiry in years.
    fn time_to_expiry(&self) -> Time;

    /// Values at expiry on a uniform lattice rooted at `spot`.
    ///
    /// The returned vector has `2n + 1` entries for `n` steps.
    fn payoff_at_expiry_trinomial(
        &self,
        spot: Real,
        down_factor: Real,
        middle_factor: Real,
    ) -> Vec<Real>;

    /// Values at expiry given the terminal state values of a precomputed
    /// tree.
    fn payoff_at_expiry_from_states(&self, state_values: &[Real]) -> Vec<Real>;

    /// Values at `layer` from the values at `layer + 1` on a uniform lattice.
    ///
    /// `spot` is the (dividend-adjusted) root level used to locate the
    /// nodes of `layer`.
    fn next_option_values(
        &self,
        discount: DiscountFactor,
        params: &LatticeParameters,
        values: &[Real],
        _spot: Real,
        _layer: usize,
    ) -> Vec<Real> {
        discounted_expectation(discount, params, values)
    }

    /// Values at `layer` from the values at `layer + 1` on a precomputed
    /// tree.
    fn next_option_values_from_data(
        &self,
        discount: DiscountFactor,
        probabilities: &[[Probability; 3]],
        _state_values: &[Real],
        values: &[Real],
        _layer: usize,
    ) -> Vec<Real> {
        discounted_expectation_per_node(discount, probabilities, values)
    }
}

// ─── OptionType ───────────────────────────────────────────────────────────────

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionType {
    /// `+1` for a call, `−1` for a put.
    pub fn sign(&self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// `max(±(spot − strike), 0)`.
    pub fn intrinsic(&self, spot: Real, strike: Real) -> Real {
        (self.sign() * (spot - strike)).max(0.0)
    }
}

/// Terms shared by the vanilla-style option functions.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VanillaTerms {
    strike: Real,
    time_to_expiry: Time,
    option_type: OptionType,
    steps: usize,
}

impl VanillaTerms {
    fn new(strike: Real, time_to_expiry: Time, option_type: OptionType, steps: usize) -> Result<Self> {
        ensure!(strike > 0.0, "strike must be positive, got {strike}");
        ensure!(
            time_to_expiry > 0.0,
            "time to expiry must be positive, got {time_to_expiry}"
        );
        ensure!(steps > 0, "number of steps must be positive");
        Ok(Self {
            strike,
            time_to_expiry,
            option_type,
            steps,
        })
    }

    fn intrinsic(&self, spot: Real) -> Real {
        self.option_type.intrinsic(spot, self.strike)
    }
}

// ─── European ─────────────────────────────────────────────────────────────────

/// European vanilla call or put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuropeanVanillaOptionFunction {
    terms: VanillaTerms,
}

impl EuropeanVanillaOptionFunction {
    /// Create a European option priced on a lattice with `steps` steps.
    pub fn new(
        strike: Real,
        time_to_expiry: Time,
        option_type: OptionType,
        steps: usize,
    ) -> Result<Self> {
        Ok(Self {
            terms: VanillaTerms::new(strike, time_to_expiry, option_type, steps)?,
        })
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.terms.strike
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.terms.option_type
    }
}

impl OptionFunction for EuropeanVanillaOptionFunction {
    fn number_of_steps(&self) -> usize {
        self.terms.steps
    }

    fn time_to_expiry(&self) -> Time {
        self.terms.time_to_expiry
    }

    fn payoff_at_expiry_trinomial(
        &self,
        spot: Real,
        down_factor: Real,
        middle_factor: Real,
    ) -> Vec<Real> {
        layer_states(spot, down_factor, middle_factor, self.terms.steps)
            .into_iter()
            .map(|s| self.terms.intrinsic(s))
            .collect()
    }

    fn payoff_at_expiry_from_states(&self, state_values: &[Real]) -> Vec<Real> {
        state_values.iter().map(|&s| self.terms.intrinsic(s)).collect()
    }
}

// ─── American ─────────────────────────────────────────────────────────────────

/// American vanilla call or put: early exercise is checked at every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmericanVanillaOptionFunction {
    terms: VanillaTerms,
}

impl AmericanVanillaOptionFunction {
    /// Create an American option priced on a lattice with `steps` steps.
    pub fn new(
        strike: Real,
        time_to_expiry: Time,
        option_type: OptionType,
        steps: usize,
    ) -> Result<Self> {
        Ok(Self {
            terms: VanillaTerms::new(strike, time_to_expiry, option_type, steps)?,
        })
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.terms.strike
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.terms.option_type
    }

    fn exercise(&self, continuation: Vec<Real>, states: &[Real]) -> Vec<Real> {
        continuation
            .into_iter()
            .zip(states)
            .map(|(hold, &s)| hold.max(self.terms.intrinsic(s)))
            .collect()
    }
}

impl OptionFunction for AmericanVanillaOptionFunction {
    fn number_of_steps(&self) -> usize {
        self.terms.steps
    }

    fn time_to_expiry(&self) -> Time {
        self.terms.time_to_expiry
    }

    fn payoff_at_expiry_trinomial(
        &self,
        spot: Real,
        down_factor: Real,
        middle_factor: Real,
    ) -> Vec<Real> {
        layer_states(spot, down_factor, middle_factor, self.terms.steps)
            .into_iter()
            .map(|s| self.terms.intrinsic(s))
            .collect()
    }

    fn payoff_at_expiry_from_states(&self, state_values: &[Real]) -> Vec<Real> {
        state_values.iter().map(|&s| self.terms.intrinsic(s)).collect()
    }

    fn next_option_values(
        &self,
        discount: DiscountFactor,
        params: &LatticeParameters,
        values: &[Real],
        spot: Real,
        layer: usize,
    ) -> Vec<Real> {
        let continuation = discounted_expectation(discount, params, values);
        let states = layer_states(spot, params.down_factor, params.middle_factor, layer);
        self.exercise(continuation, &states)
    }

    fn next_option_values_from_data(
        &self,
        discount: DiscountFactor,
        probabilities: &[[Probability; 3]],
        state_values: &[Real],
        values: &[Real],
        _layer: usize,
    ) -> Vec<Real> {
        let continuation = discounted_expectation_per_node(discount, probabilities, values);
        self.exercise(continuation, state_values)
    }
}

// ─── Single barrier knock-out ─────────────────────────────────────────────────

/// Direction of a knock-out barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierType {
    /// Knocked out when the underlying reaches the barrier from below.
    UpAndOut,
    /// Knocked out when the underlying reaches the barrier from above.
    DownAndOut,
}

impl BarrierType {
    /// Whether `spot` is on or beyond `barrier`.
    pub fn is_knocked_out(&self, spot: Real, barrier: Real) -> bool {
        match self {
            BarrierType::UpAndOut => spot >= barrier,
            BarrierType::DownAndOut => spot <= barrier,
        }
    }
}

/// European knock-out option with a constant, continuously monitored
/// barrier and a constant rebate paid when the barrier is hit.
///
/// Nodes on or beyond the barrier take the rebate; all other nodes follow
/// the European rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantContinuousSingleBarrierKnockoutFunction {
    terms: VanillaTerms,
    barrier_type: BarrierType,
    barrier_level: Real,
    rebate: Real,
}

impl ConstantContinuousSingleBarrierKnockoutFunction {
    /// Create a knock-out option priced on a lattice with `steps` steps.
    pub fn new(
        strike: Real,
        time_to_expiry: Time,
        option_type: OptionType,
        steps: usize,
        barrier_type: BarrierType,
        barrier_level: Real,
        rebate: Real,
    ) -> Result<Self> {
        ensure!(
            barrier_level > 0.0,
            "barrier level must be positive, got {barrier_level}"
        );
        ensure!(rebate >= 0.0, "rebate must be non-negative, got {rebate}");
        Ok(Self {
            terms: VanillaTerms::new(strike, time_to_expiry, option_type, steps)?,
            barrier_type,
            barrier_level,
            rebate,
        })
    }

    /// Barrier direction.
    pub fn barrier_type(&self) -> BarrierType {
        self.barrier_type
    }

    /// Barrier level.
    pub fn barrier_level(&self) -> Real {
        self.barrier_level
    }

    /// Rebate paid on knock-out.
    pub fn rebate(&self) -> Real {
        self.rebate
    }

    fn knock_out(&self, values: Vec<Real>, states: &[Real]) -> Vec<Real> {
        values
            .into_iter()
            .zip(states)
            .map(|(v, &s)| {
                if self.barrier_type.is_knocked_out(s, self.barrier_level) {
                    self.rebate
                } else {
                    v
                }
            })
            .collect()
    }
}

impl OptionFunction for ConstantContinuousSingleBarrierKnockoutFunction {
    fn number_of_steps(&self) -> usize {
        self.terms.steps
    }

    fn time_to_expiry(&self) -> Time {
        self.terms.time_to_expiry
    }

    fn payoff_at_expiry_trinomial(
        &self,
        spot: Real,
        down_factor: Real,
        middle_factor: Real,
    ) -> Vec<Real> {
        let states = layer_states(spot, down_factor, middle_factor, self.terms.steps);
        self.payoff_at_expiry_from_states(&states)
    }

    fn payoff_at_expiry_from_states(&self, state_values: &[Real]) -> Vec<Real> {
        let payoff = state_values.iter().map(|&s| self.terms.intrinsic(s)).collect();
        self.knock_out(payoff, state_values)
    }

    fn next_option_values(
        &self,
        discount: DiscountFactor,
        params: &LatticeParameters,
        values: &[Real],
        spot: Real,
        layer: usize,
    ) -> Vec<Real> {
        let continuation = discounted_expectation(discount, params, values);
        let states = layer_states(spot, params.down_factor, params.middle_factor, layer);
        self.knock_out(continuation, &states)
    }

    fn next_option_values_from_data(
        &self,
        discount: DiscountFactor,
        probabilities: &[[Probability; 3]],
        state_values: &[Real],
        values: &[Real],
        _layer: usize,
    ) -> Vec<Real> {
        let continuation = discounted_expectation_per_node(discount, probabilities, values);
        self.knock_out(continuation, state_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn crr_like() -> LatticeParameters {
        LatticeParameters::new(1.1, 1.0, 1.0 / 1.1, 0.3, 0.45, 0.25)
    }

    #[test]
    fn layer_states_are_ordered_and_centred() {
        let states = layer_states(100.0, 0.9, 1.0, 2);
        assert_eq!(states.len(), 5);
        assert_abs_diff_eq!(states[0], 81.0, epsilon = 1e-12);
        assert_abs_diff_eq!(states[2], 100.0, epsilon = 1e-12);
        assert!(states.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(layer_states(100.0, 0.9, 1.0, 0), vec![100.0]);
    }

    #[test]
    fn discounted_expectation_shrinks_by_two() {
        let p = crr_like();
        let next = discounted_expectation(0.99, &p, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(next.len(), 3);
        assert_abs_diff_eq!(next[0], 0.99 * (0.3 * 3.0 + 0.45 * 2.0 + 0.25 * 1.0));
    }

    #[test]
    fn per_node_expectation_matches_constant() {
        let p = crr_like();
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let probs = vec![p.probabilities(); 3];
        let a = discounted_expectation(0.98, &p, &values);
        let b = discounted_expectation_per_node(0.98, &probs, &values);
        assert_eq!(a, b);
    }

    #[test]
    fn european_payoff_at_expiry() {
        let f = EuropeanVanillaOptionFunction::new(100.0, 1.0, OptionType::Put, 1).unwrap();
        let payoff = f.payoff_at_expiry_trinomial(100.0, 0.8, 1.0);
        assert_eq!(payoff.len(), 3);
        assert_abs_diff_eq!(payoff[0], 20.0, epsilon = 1e-12);
        assert_eq!(payoff[1], 0.0);
        assert_eq!(payoff[2], 0.0);
    }

    #[test]
    fn vanilla_terms_are_validated() {
        assert!(EuropeanVanillaOptionFunction::new(-1.0, 1.0, OptionType::Call, 10).is_err());
        assert!(EuropeanVanillaOptionFunction::new(100.0, 0.0, OptionType::Call, 10).is_err());
        assert!(AmericanVanillaOptionFunction::new(100.0, 1.0, OptionType::Call, 0).is_err());
    }

    #[test]
    fn american_exercise_dominates_continuation() {
        let f = AmericanVanillaOptionFunction::new(100.0, 1.0, OptionType::Put, 2).unwrap();
        let p = crr_like();
        let expiry = f.payoff_at_expiry_trinomial(100.0, p.down_factor, p.middle_factor);
        let next = f.next_option_values(0.99, &p, &expiry, 100.0, 1);
        let states = layer_states(100.0, p.down_factor, p.middle_factor, 1);
        for (v, s) in next.iter().zip(&states) {
            assert!(*v >= (100.0 - s).max(0.0) - 1e-12);
        }
        // The lowest node is deep in the money and exercised.
        assert_abs_diff_eq!(next[0], 100.0 - states[0], epsilon = 1e-12);
    }

    #[test]
    fn knockout_nodes_take_rebate() {
        let f = ConstantContinuousSingleBarrierKnockoutFunction::new(
            100.0,
            1.0,
            OptionType::Call,
            1,
            BarrierType::UpAndOut,
            105.0,
            2.5,
        )
        .unwrap();
        let payoff = f.payoff_at_expiry_trinomial(100.0, 1.0 / 1.1, 1.0);
        assert_eq!(payoff[2], 2.5);
        assert_eq!(payoff[1], 0.0);
        assert_eq!(payoff[0], 0.0);
        assert!(BarrierType::DownAndOut.is_knocked_out(90.0, 90.0));
        assert!(!BarrierType::DownAndOut.is_knocked_out(90.1, 90.0));
    }
}
