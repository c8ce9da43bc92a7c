//! Lattice specifications: how a trinomial lattice is shaped.
//!
//! A [`LatticeSpecification`] maps `(volatility, drift, Δt)` to the six
//! [`LatticeParameters`] of a recombining trinomial lattice.
//!
//! | Specification | Spacing | Probabilities |
//! |---|---|---|
//! | [`CoxRossRubinsteinLatticeSpecification`] | `σ √(2Δt)` | moment matched, `m = 1` |
//! | [`TrigeorgisLatticeSpecification`] | `σ √(3Δt)` | log-space moment matched, `m = 1` |
//! | [`EqualProbabilitiesLatticeSpecification`] | `σ √(1.5Δt)` around the drift | `1/3` each |

use ql_core::{Rate, Real, Time, Volatility};

use super::LatticeParameters;

/// Derives trinomial lattice parameters from constant market inputs.
///
/// Implementations should return probabilities that form a distribution;
/// the pricing engine only checks their bounds.
pub trait LatticeSpecification {
    /// Parameters of one lattice step of length `dt` for the given
    /// volatility and drift (`rate − dividend yield`, or just the rate when
    /// discrete dividends are handled on the spot).
    fn parameters_trinomial(&self, volatility: Volatility, drift: Rate, dt: Time)
        -> LatticeParameters;
}

/// Trinomial analogue of the Cox-Ross-Rubinstein tree.
///
/// Obtained by collapsing two binomial CRR steps of length `Δt/2` into one
/// trinomial step:
///
/// * `dx = σ √(2Δt)`, `u = e^{dx}`, `m = 1`, `d = e^{−dx}`
/// * `p_u = ((e^{μΔt/2} − e^{−dx/2}) / (e^{dx/2} − e^{−dx/2}))²`
/// * `p_d = ((e^{dx/2} − e^{μΔt/2}) / (e^{dx/2} − e^{−dx/2}))²`
/// * `p_m = 1 − p_u − p_d`
#[derive(Debug, Clone, Copy, Default)]
pub struct CoxRossRubinsteinLatticeSpecification;

impl LatticeSpecification for CoxRossRubinsteinLatticeSpecification {
    fn parameters_trinomial(
        &self,
        volatility: Volatility,
        drift: Rate,
        dt: Time,
    ) -> LatticeParameters {
        let dx = volatility * (2.0 * dt).sqrt();
        let up_factor = dx.exp();
        let down_factor = (-dx).exp();
        let growth = (0.5 * drift * dt).exp();
        let half_up = (0.5 * dx).exp();
        let half_down = (-0.5 * dx).exp();
        let spread = half_up - half_down;
        let up_probability = ((growth - half_down) / spread).powi(2);
        let down_probability = ((half_up - growth) / spread).powi(2);
        let middle_probability = 1.0 - up_probability - down_probability;
        LatticeParameters::new(
            up_factor,
            1.0,
            down_factor,
            up_probability,
            middle_probability,
            down_probability,
        )
    }
}

/// Trigeorgis (log-transformed) trinomial lattice.
///
/// * `dx = σ √(3Δt)`, `ν = μ − σ²/2`
/// * `part = (σ²Δt + ν²Δt²) / dx²`
/// * `p_u = (part + νΔt/dx) / 2`, `p_m = 1 − part`, `p_d = (part − νΔt/dx) / 2`
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigeorgisLatticeSpecification;

impl LatticeSpecification for TrigeorgisLatticeSpecification {
    fn parameters_trinomial(
        &self,
        volatility: Volatility,
        drift: Rate,
        dt: Time,
    ) -> LatticeParameters {
        let var = volatility * volatility;
        let nu = drift - 0.5 * var;
        let dx = volatility * (3.0 * dt).sqrt();
        let part = (var * dt + nu * nu * dt * dt) / (dx * dx);
        let skew = nu * dt / dx;
        LatticeParameters::new(
            dx.exp(),
            1.0,
            (-dx).exp(),
            0.5 * (part + skew),
            1.0 - part,
            0.5 * (part - skew),
        )
    }
}

/// Equal-probabilities trinomial lattice.
///
/// All three branches carry probability `1/3`; the log-spacing
/// `σ √(1.5Δt)` around the drift `νΔt = (μ − σ²/2)Δt` matches the mean and
/// variance of the log-return.  The middle factor is `e^{νΔt}` and
/// `m² = u·d`, so the lattice recombines.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualProbabilitiesLatticeSpecification;

impl LatticeSpecification for EqualProbabilitiesLatticeSpecification {
    fn parameters_trinomial(
        &self,
        volatility: Volatility,
        drift: Rate,
        dt: Time,
    ) -> LatticeParameters {
        let nu = drift - 0.5 * volatility * volatility;
        let dx = volatility * (1.5 * dt).sqrt();
        let middle_factor = (nu * dt).exp();
        let third: Real = 1.0 / 3.0;
        LatticeParameters::new(
            middle_factor * dx.exp(),
            middle_factor,
            middle_factor * (-dx).exp(),
            third,
            third,
            third,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const VOL: Real = 0.2;
    const RATE: Real = 0.05;
    const DT: Real = 0.01;

    /// First two moments of the one-step gross return under the lattice.
    fn moments(p: &LatticeParameters) -> (Real, Real) {
        let mean = p.up_probability * p.up_factor
            + p.middle_probability * p.middle_factor
            + p.down_probability * p.down_factor;
        let second = p.up_probability * p.up_factor.powi(2)
            + p.middle_probability * p.middle_factor.powi(2)
            + p.down_probability * p.down_factor.powi(2);
        (mean, second)
    }

    #[test]
    fn crr_probabilities_sum_to_one_and_match_forward() {
        let p = CoxRossRubinsteinLatticeSpecification.parameters_trinomial(VOL, RATE, DT);
        assert_abs_diff_eq!(p.probability_sum(), 1.0, epsilon = 1e-14);
        assert!(p.validate(None).is_ok());
        assert_abs_diff_eq!(p.up_factor * p.down_factor, 1.0, epsilon = 1e-14);
        let (mean, _) = moments(&p);
        assert_abs_diff_eq!(mean, (RATE * DT).exp(), epsilon = 1e-12);
    }

    #[test]
    fn trigeorgis_matches_log_moments() {
        let p = TrigeorgisLatticeSpecification.parameters_trinomial(VOL, RATE, DT);
        assert_abs_diff_eq!(p.probability_sum(), 1.0, epsilon = 1e-14);
        assert!(p.validate(None).is_ok());
        let dx = p.up_factor.ln();
        let nu = RATE - 0.5 * VOL * VOL;
        let log_mean = (p.up_probability - p.down_probability) * dx;
        let log_second = (p.up_probability + p.down_probability) * dx * dx;
        assert_abs_diff_eq!(log_mean, nu * DT, epsilon = 1e-14);
        assert_abs_diff_eq!(log_second, VOL * VOL * DT + nu * nu * DT * DT, epsilon = 1e-14);
    }

    #[test]
    fn equal_probabilities_recombine() {
        let p = EqualProbabilitiesLatticeSpecification.parameters_trinomial(VOL, RATE, DT);
        assert_abs_diff_eq!(p.up_probability, 1.0 / 3.0);
        assert_abs_diff_eq!(p.middle_probability, 1.0 / 3.0);
        assert_abs_diff_eq!(p.down_probability, 1.0 / 3.0);
        assert_abs_diff_eq!(
            p.middle_factor * p.middle_factor,
            p.up_factor * p.down_factor,
            epsilon = 1e-14
        );
        let (mean, _) = moments(&p);
        // Log-moment matching only gets the forward to first order in Δt.
        assert_abs_diff_eq!(mean, (RATE * DT).exp(), epsilon = 1e-5);
    }

    #[test]
    fn crr_with_large_drift_breaks_bounds() {
        // Drift dominates the spacing: the up probability leaves (0, 1).
        let p = CoxRossRubinsteinLatticeSpecification.parameters_trinomial(0.01, 2.0, 0.5);
        assert!(p.validate(None).is_err());
    }
}
