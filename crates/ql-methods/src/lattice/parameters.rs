//! Trinomial lattice parameters.
//!
//! A [`LatticeParameters`] value carries the three step factors and the
//! three risk-neutral branch probabilities of a uniform trinomial lattice.
//! It is produced by a [`LatticeSpecification`](super::LatticeSpecification)
//! once per pricing call and never mutated afterwards.

use ql_core::{errors::Result, Error, Probability, Real};

/// Step factors and branch probabilities of a uniform trinomial lattice.
///
/// The fixed ordering `(up factor, middle factor, down factor, up
/// probability, middle probability, down probability)` is preserved by
/// [`from_array`](Self::from_array) and [`to_array`](Self::to_array).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeParameters {
    /// Multiplicative factor applied to the underlying on an up move.
    pub up_factor: Real,
    /// Multiplicative factor applied on a middle move.
    pub middle_factor: Real,
    /// Multiplicative factor applied on a down move.
    pub down_factor: Real,
    /// Risk-neutral probability of an up move.
    pub up_probability: Probability,
    /// Risk-neutral probability of a middle move.
    pub middle_probability: Probability,
    /// Risk-neutral probability of a down move.
    pub down_probability: Probability,
}

impl LatticeParameters {
    /// Create a parameter set from its six components.
    pub fn new(
        up_factor: Real,
        middle_factor: Real,
        down_factor: Real,
        up_probability: Probability,
        middle_probability: Probability,
        down_probability: Probability,
    ) -> Self {
        Self {
            up_factor,
            middle_factor,
            down_factor,
            up_probability,
            middle_probability,
            down_probability,
        }
    }

    /// Build from the canonical six-element ordering.
    pub fn from_array(values: [Real; 6]) -> Self {
        let [u, m, d, pu, pm, pd] = values;
        Self::new(u, m, d, pu, pm, pd)
    }

    /// The canonical six-element ordering.
    pub fn to_array(&self) -> [Real; 6] {
        [
            self.up_factor,
            self.middle_factor,
            self.down_factor,
            self.up_probability,
            self.middle_probability,
            self.down_probability,
        ]
    }

    /// Branch probabilities ordered `(down, middle, up)`, the column order
    /// used by precomputed tree data.
    pub fn probabilities(&self) -> [Probability; 3] {
        [
            self.down_probability,
            self.middle_probability,
            self.up_probability,
        ]
    }

    /// `up + middle + down`.
    pub fn probability_sum(&self) -> Real {
        self.up_probability + self.middle_probability + self.down_probability
    }

    /// Check the probability bounds the induction relies on.
    ///
    /// The up and middle probabilities must lie in the open interval
    /// `(0, 1)`; the down probability must be strictly positive.  When
    /// `sum_tolerance` is given, the three probabilities must also add up to
    /// one within that tolerance.  NaN fails every check.
    pub fn validate(&self, sum_tolerance: Option<Real>) -> Result<()> {
        let checks: [(&'static str, Real, bool); 3] = [
            ("upProbability", self.up_probability, true),
            ("midProbability", self.middle_probability, true),
            ("downProbability", self.down_probability, false),
        ];
        for (name, value, bounded_above) in checks {
            let positive = value > 0.0;
            let below_one = !bounded_above || value < 1.0;
            if !(positive && below_one) {
                return Err(Error::InvalidProbability { name, value });
            }
        }
        if let Some(tolerance) = sum_tolerance {
            let sum = self.probability_sum();
            let close = (sum - 1.0).abs() <= tolerance;
            if !close {
                return Err(Error::InvalidProbability {
                    name: "sum",
                    value: sum,
                });
            }
        }
        Ok(())
    }
}
