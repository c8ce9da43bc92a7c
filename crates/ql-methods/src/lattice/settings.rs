//! Engine settings for trinomial tree pricing.

use ql_core::Real;

/// Volatility and rate bump used for bump-and-reprice vega and rho.
pub const DEFAULT_BUMP: Real = 1.0e-6;

/// Settings of a [`TrinomialTree`](super::TrinomialTree) engine.
///
/// The defaults reproduce the classic behaviour: a `1e-6` forward bump for
/// vega and rho, and no check that the branch probabilities add up to one
/// (that is left to the lattice specification).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSettings {
    /// Absolute bump applied to volatility and interest rate.
    pub bump: Real,
    /// When set, `|p_u + p_m + p_d − 1|` must not exceed this tolerance.
    pub probability_sum_tolerance: Option<Real>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            bump: DEFAULT_BUMP,
            probability_sum_tolerance: None,
        }
    }
}

impl TreeSettings {
    /// Use a different bump size.
    pub fn with_bump(mut self, bump: Real) -> Self {
        self.bump = bump;
        self
    }

    /// Require the branch probabilities to sum to one within `tolerance`.
    pub fn with_probability_sum_tolerance(mut self, tolerance: Real) -> Self {
        self.probability_sum_tolerance = Some(tolerance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let s = TreeSettings::default();
        assert_eq!(s.bump, 1.0e-6);
        assert_eq!(s.probability_sum_tolerance, None);

        let s = s.with_bump(1.0e-4).with_probability_sum_tolerance(1.0e-10);
        assert_eq!(s.bump, 1.0e-4);
        assert_eq!(s.probability_sum_tolerance, Some(1.0e-10));
    }
}
