//! Option pricing by backward induction on a recombining trinomial lattice.
//!
//! The lattice is either described by a [`LatticeSpecification`] together
//! with constant market inputs, or given as precomputed
//! [`RecombiningTrinomialTreeData`].  Both routes run the same induction
//! loop over a [`LatticeSource`]:
//!
//! 1. the option function builds the expiry values;
//! 2. layers `n − 1, …, 0` are computed in turn, each replacing the value
//!    vector of the layer after it;
//! 3. the price is the single value left on layer 0.
//!
//! Delta, gamma and theta are read off the three nodes of layer 1.  Vega and
//! rho are forward bump-and-reprice estimates obtained by pricing again with
//! the volatility or the rate bumped.

use ql_core::{ensure, ensure_post, errors::Result, Error, Rate, Real, Volatility};
use tracing::{debug, trace, warn};

use super::{
    Dividends, LatticeSource, LatticeSpecification, OptionFunction, RecombiningTrinomialTreeData,
    TreeSettings, UniformLattice,
};

/// Day count used to express theta per calendar day.
const DAYS_PER_YEAR: Real = 365.0;

// ─── Results ──────────────────────────────────────────────────────────────────

/// Present value and its sensitivities at time zero.
///
/// Sensitivities that a pricing route cannot compute are left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueDerivatives {
    /// Present value.
    pub value: Real,
    /// First derivative with respect to spot.
    pub delta: Real,
    /// First derivative with respect to volatility (per unit of volatility).
    pub vega: Real,
    /// First derivative with respect to the interest rate (per unit of rate).
    pub rho: Real,
    /// Change in value per calendar day.
    pub theta: Real,
    /// Second derivative with respect to spot.
    pub gamma: Real,
}

impl ValueDerivatives {
    /// A bundle carrying only a value.
    pub fn of_value(value: Real) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Sensitivities in the order `[delta, vega, rho, theta, gamma]`.
    pub fn derivatives(&self) -> [Real; 5] {
        [self.delta, self.vega, self.rho, self.theta, self.gamma]
    }
}

/// Local finite differences on the three nodes of layer 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOneGreeks {
    /// Average of the two one-sided slopes.
    pub delta: Real,
    /// Difference of the one-sided slopes over half the layer width.
    pub gamma: Real,
    /// Value at the middle node, one time step after inception.
    pub middle_value: Real,
}

impl LayerOneGreeks {
    /// Extract slopes from node values `(v0, v1, v2)` at underlying levels
    /// `(s0, s1, s2)`, ordered down, middle, up.
    pub fn from_nodes(values: [Real; 3], states: [Real; 3]) -> Self {
        let [v0, v1, v2] = values;
        let [s0, s1, s2] = states;
        let d1 = (v2 - v1) / (s2 - s1);
        let d2 = (v1 - v0) / (s1 - s0);
        Self {
            delta: 0.5 * (d1 + d2),
            gamma: (d1 - d2) / (0.5 * (s2 - s0)),
            middle_value: v1,
        }
    }
}

/// Outcome of a single induction pass.
struct Induction {
    value: Real,
    layer_one: Option<[Real; 3]>,
}

fn induct<S, F>(source: &S, function: &F, capture_layer_one: bool) -> Result<Induction>
where
    S: LatticeSource,
    F: OptionFunction + ?Sized,
{
    let steps = source.number_of_steps();
    let mut values = source.payoff_at_expiry(function);
    let mut layer_one = None;
    for i in (0..steps).rev() {
        values = source.next_option_values(function, &values, i);
        if capture_layer_one && i == 1 {
            ensure_post!(
                values.len() >= 3,
                "layer 1 must hold three nodes, got {}",
                values.len()
            );
            layer_one = Some([values[0], values[1], values[2]]);
        }
    }
    ensure_post!(
        !values.is_empty(),
        "backward induction left no value at the root"
    );
    Ok(Induction {
        value: values[0],
        layer_one,
    })
}

// ─── TrinomialTree ────────────────────────────────────────────────────────────

/// Trinomial tree pricing engine.
///
/// The engine holds only its [`TreeSettings`]; every pricing call is a pure
/// function of its inputs.
///
/// # Example
/// ```
/// use ql_methods::lattice::{
///     CoxRossRubinsteinLatticeSpecification, Dividends, EuropeanVanillaOptionFunction,
///     OptionType, TrinomialTree,
/// };
///
/// let call = EuropeanVanillaOptionFunction::new(100.0, 1.0, OptionType::Call, 100).unwrap();
/// let tree = TrinomialTree::new();
/// let price = tree
///     .option_price(
///         &call,
///         &CoxRossRubinsteinLatticeSpecification,
///         100.0,
///         0.2,
///         0.05,
///         &Dividends::Continuous(0.0),
///     )
///     .unwrap();
/// assert!((price - 10.45).abs() < 0.05);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrinomialTree {
    settings: TreeSettings,
}

impl TrinomialTree {
    /// Engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the given settings.
    pub fn with_settings(settings: TreeSettings) -> Self {
        Self { settings }
    }

    /// Engine settings.
    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Derive and validate the uniform lattice for constant market inputs.
    ///
    /// `Δt = T / n`, the one-step discount is `exp(−r Δt)` and the lattice
    /// drift is `r − q` for a continuous yield `q`, or `r` for discrete
    /// dividends.
    pub fn uniform_lattice<'a, F, L>(
        &self,
        function: &F,
        lattice: &L,
        spot: Real,
        volatility: Volatility,
        interest_rate: Rate,
        dividends: &'a Dividends,
    ) -> Result<UniformLattice<'a>>
    where
        F: OptionFunction + ?Sized,
        L: LatticeSpecification + ?Sized,
    {
        let steps = function.number_of_steps();
        let dt = function.time_to_expiry() / steps as Real;
        let discount = (-interest_rate * dt).exp();
        let params = lattice.parameters_trinomial(volatility, dividends.drift(interest_rate), dt);
        if let Err(err) = params.validate(self.settings.probability_sum_tolerance) {
            warn!(%err, volatility, interest_rate, dt, "rejecting trinomial lattice");
            return Err(err);
        }
        debug!(
            steps,
            dt,
            up_factor = params.up_factor,
            middle_factor = params.middle_factor,
            down_factor = params.down_factor,
            up_probability = params.up_probability,
            middle_probability = params.middle_probability,
            down_probability = params.down_probability,
            "derived trinomial lattice"
        );
        Ok(UniformLattice::new(
            params,
            discount,
            dt,
            steps,
            spot,
            dividends.schedule(),
        ))
    }

    /// Price an option on the lattice described by `lattice`.
    ///
    /// Volatility, interest rate and dividends are constant over the life of
    /// the option.  Fails with [`Error::InvalidProbability`] before any
    /// induction if the derived probabilities are out of bounds.
    pub fn option_price<F, L>(
        &self,
        function: &F,
        lattice: &L,
        spot: Real,
        volatility: Volatility,
        interest_rate: Rate,
        dividends: &Dividends,
    ) -> Result<Real>
    where
        F: OptionFunction + ?Sized,
        L: LatticeSpecification + ?Sized,
    {
        let source =
            self.uniform_lattice(function, lattice, spot, volatility, interest_rate, dividends)?;
        Ok(induct(&source, function, false)?.value)
    }

    /// Price an option and its delta, gamma, theta, vega and rho.
    ///
    /// Delta and gamma come from the three nodes of layer 1, theta from the
    /// middle node of layer 1 against the price, per calendar day.  Vega and
    /// rho reprice with volatility, respectively rate, bumped by
    /// [`TreeSettings::bump`].  With fewer than two steps layer 1 is never an
    /// interior layer and delta, gamma and theta stay zero.
    ///
    /// Layer 1 is read at the undivided spot: a dividend going ex on the
    /// first step is not accounted for in delta, gamma or theta.
    pub fn option_price_adjoint<F, L>(
        &self,
        function: &F,
        lattice: &L,
        spot: Real,
        volatility: Volatility,
        interest_rate: Rate,
        dividends: &Dividends,
    ) -> Result<ValueDerivatives>
    where
        F: OptionFunction + ?Sized,
        L: LatticeSpecification + ?Sized,
    {
        let bump = self.settings.bump;
        ensure!(
            bump > 0.0 && bump.is_finite(),
            "bump must be positive and finite, got {bump}"
        );
        let source =
            self.uniform_lattice(function, lattice, spot, volatility, interest_rate, dividends)?;
        let pass = induct(&source, function, true)?;
        let value = pass.value;
        let mut result = ValueDerivatives::of_value(value);

        if let (Some(nodes), Some(states)) = (pass.layer_one, source.layer_one_states()) {
            let local = LayerOneGreeks::from_nodes(nodes, states);
            result.delta = local.delta;
            result.gamma = local.gamma;
            result.theta = (local.middle_value - value) / source.dt() / DAYS_PER_YEAR;
        }

        let bumped_vol = self.option_price(
            function,
            lattice,
            spot,
            volatility + bump,
            interest_rate,
            dividends,
        )?;
        let bumped_rate = self.option_price(
            function,
            lattice,
            spot,
            volatility,
            interest_rate + bump,
            dividends,
        )?;
        result.vega = (bumped_vol - value) / bump;
        result.rho = (bumped_rate - value) / bump;
        trace!(
            value,
            delta = result.delta,
            gamma = result.gamma,
            theta = result.theta,
            vega = result.vega,
            rho = result.rho,
            "trinomial greeks"
        );
        Ok(result)
    }

    /// Price an option on a precomputed tree.
    ///
    /// Fails with [`Error::StepMismatch`] if the option function and the
    /// tree disagree on the number of steps.
    pub fn option_price_from_data<F>(
        &self,
        function: &F,
        data: &RecombiningTrinomialTreeData,
    ) -> Result<Real>
    where
        F: OptionFunction + ?Sized,
    {
        check_steps(function, data)?;
        Ok(induct(data, function, false)?.value)
    }

    /// Price an option and its spot delta on a precomputed tree.
    ///
    /// Only delta is available: the tree carries no handle on the
    /// volatility or rate that produced it.
    pub fn option_price_adjoint_from_data<F>(
        &self,
        function: &F,
        data: &RecombiningTrinomialTreeData,
    ) -> Result<ValueDerivatives>
    where
        F: OptionFunction + ?Sized,
    {
        check_steps(function, data)?;
        let pass = induct(data, function, true)?;
        let mut result = ValueDerivatives::of_value(pass.value);
        if let (Some(nodes), Some(states)) = (pass.layer_one, data.layer_one_states()) {
            result.delta = LayerOneGreeks::from_nodes(nodes, states).delta;
        }
        trace!(value = result.value, delta = result.delta, "trinomial tree data delta");
        Ok(result)
    }
}

fn check_steps<F>(function: &F, data: &RecombiningTrinomialTreeData) -> Result<()>
where
    F: OptionFunction + ?Sized,
{
    let expected = function.number_of_steps();
    let available = data.number_of_steps();
    if expected != available {
        warn!(expected, available, "mismatch in number of steps");
        return Err(Error::StepMismatch {
            function: expected,
            data: available,
        });
    }
    Ok(())
}
