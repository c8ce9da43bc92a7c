//! Dividend treatment on a uniform trinomial lattice.
//!
//! A flat continuous yield enters the lattice drift.  A discrete schedule of
//! proportional dividends is applied multiplicatively to the spot instead:
//! the expiry layer is seeded with the spot net of every scheduled dividend,
//! and each induction step sees the spot net of the dividends already gone
//! ex-dividend by that step's time.

use ql_core::{ensure, errors::Result, Rate, Real, Time};

/// Proportional dividends and their ex-dividend times.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividendSchedule {
    yields: Vec<Real>,
    times: Vec<Time>,
}

impl DividendSchedule {
    /// Create a schedule from parallel sequences of yields and times.
    ///
    /// Every yield must lie in `[0, 1)` and every time must be non-negative.
    pub fn new(yields: Vec<Real>, times: Vec<Time>) -> Result<Self> {
        ensure!(
            yields.len() == times.len(),
            "dividend yields ({}) and times ({}) must have the same length",
            yields.len(),
            times.len()
        );
        for (&y, &t) in yields.iter().zip(&times) {
            ensure!(
                (0.0..1.0).contains(&y),
                "dividend yield must be in [0, 1), got {y}"
            );
            ensure!(t >= 0.0, "ex-dividend time must be non-negative, got {t}");
        }
        Ok(Self { yields, times })
    }

    /// A schedule with no dividends.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of scheduled dividends.
    pub fn len(&self) -> usize {
        self.yields.len()
    }

    /// Whether no dividend is scheduled.
    pub fn is_empty(&self) -> bool {
        self.yields.is_empty()
    }

    /// Dividend yields.
    pub fn yields(&self) -> &[Real] {
        &self.yields
    }

    /// Ex-dividend times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// `Π (1 − yᵢ)` over every scheduled dividend, regardless of timing.
    pub fn cumulative_multiplier(&self) -> Real {
        self.yields.iter().map(|y| 1.0 - y).product()
    }

    /// `Π (1 − yⱼ)` over the dividends whose ex-time is strictly before `time`.
    pub fn multiplier_before(&self, time: Time) -> Real {
        self.yields
            .iter()
            .zip(&self.times)
            .filter(|&(_, &t)| time > t)
            .map(|(y, _)| 1.0 - y)
            .product()
    }
}

/// How the underlying pays dividends over the life of the option.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dividends {
    /// Flat continuous dividend yield.
    Continuous(Rate),
    /// Discrete proportional dividends.
    Discrete(DividendSchedule),
}

impl Default for Dividends {
    fn default() -> Self {
        Dividends::Continuous(0.0)
    }
}

impl Dividends {
    /// Drift of the lattice for the given interest rate.
    ///
    /// Discrete dividends do not enter the drift.
    pub fn drift(&self, interest_rate: Rate) -> Rate {
        match self {
            Dividends::Continuous(q) => interest_rate - q,
            Dividends::Discrete(_) => interest_rate,
        }
    }

    /// The discrete schedule, if any.
    pub fn schedule(&self) -> Option<&DividendSchedule> {
        match self {
            Dividends::Continuous(_) => None,
            Dividends::Discrete(schedule) => Some(schedule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn schedule_validation() {
        assert!(DividendSchedule::new(vec![0.02], vec![0.5, 0.7]).is_err());
        assert!(DividendSchedule::new(vec![1.0], vec![0.5]).is_err());
        assert!(DividendSchedule::new(vec![-0.1], vec![0.5]).is_err());
        assert!(DividendSchedule::new(vec![0.02], vec![-0.5]).is_err());
        let s = DividendSchedule::new(vec![0.02, 0.03], vec![0.25, 0.75]).unwrap();
        assert_eq!(s.len(), 2);
        assert!(!s.is_empty());
    }

    #[test]
    fn cumulative_multiplier_ignores_timing() {
        let s = DividendSchedule::new(vec![0.02, 0.03], vec![0.25, 5.0]).unwrap();
        assert_abs_diff_eq!(s.cumulative_multiplier(), 0.98 * 0.97);
        assert_eq!(DividendSchedule::empty().cumulative_multiplier(), 1.0);
    }

    #[test]
    fn multiplier_before_is_strict() {
        let s = DividendSchedule::new(vec![0.02, 0.03], vec![0.25, 0.75]).unwrap();
        assert_eq!(s.multiplier_before(0.25), 1.0);
        assert_abs_diff_eq!(s.multiplier_before(0.5), 0.98);
        assert_abs_diff_eq!(s.multiplier_before(0.75), 0.98);
        assert_abs_diff_eq!(s.multiplier_before(1.0), 0.98 * 0.97);
    }

    #[test]
    fn drift_depends_on_dividend_model() {
        assert_abs_diff_eq!(Dividends::Continuous(0.02).drift(0.05), 0.03);
        let discrete = Dividends::Discrete(DividendSchedule::empty());
        assert_eq!(discrete.drift(0.05), 0.05);
        assert!(discrete.schedule().is_some());
        assert!(Dividends::default().schedule().is_none());
    }
}
