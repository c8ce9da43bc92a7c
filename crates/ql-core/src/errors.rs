//! Error types for the lattice pricer.
//!
//! A single `thiserror`-derived enum covers every failure the pricing
//! engine and its collaborators can report.  Generic precondition and
//! postcondition checks go through the [`ensure!`](crate::ensure),
//! [`ensure_post!`](crate::ensure_post) and [`fail!`](crate::fail) macros;
//! the two lattice-specific failures (invalid probabilities and a step-count
//! mismatch) have dedicated variants so callers can match on them.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// A transition probability lies outside its admissible range.
    #[error("invalid probability: {name} = {value}")]
    InvalidProbability {
        /// Which probability failed (`"upProbability"`, `"sum"`, ...).
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The option function and the lattice data disagree on the number of
    /// time steps.
    #[error("mismatch in number of steps: option function has {function}, lattice data has {data}")]
    StepMismatch {
        /// Steps requested by the option function.
        function: usize,
        /// Steps available in the lattice data.
        data: usize,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::ensure;
/// fn strike(k: f64) -> ql_core::errors::Result<f64> {
///     ensure!(k > 0.0, "strike must be positive, got {k}");
///     Ok(k)
/// }
/// assert!(strike(100.0).is_ok());
/// assert!(strike(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::ensure_post;
/// fn root_value(values: &[f64]) -> ql_core::errors::Result<f64> {
///     ensure_post!(values.len() == 1, "expected a single root node, got {}", values.len());
///     Ok(values[0])
/// }
/// assert!(root_value(&[1.0]).is_ok());
/// assert!(root_value(&[1.0, 2.0]).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::fail;
/// fn unsupported() -> ql_core::errors::Result<()> {
///     fail!("lattice layout not supported");
/// }
/// assert!(unsupported().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_probability_message() {
        let err = Error::InvalidProbability {
            name: "upProbability",
            value: 1.0,
        };
        assert_eq!(err.to_string(), "invalid probability: upProbability = 1");
    }

    #[test]
    fn step_mismatch_message() {
        let err = Error::StepMismatch {
            function: 10,
            data: 12,
        };
        assert!(err.to_string().contains("mismatch in number of steps"));
    }

    #[test]
    fn ensure_returns_precondition() {
        fn check(x: f64) -> Result<()> {
            crate::ensure!(x >= 0.0, "negative: {x}");
            Ok(())
        }
        assert_eq!(
            check(-2.0),
            Err(Error::Precondition("negative: -2".to_string()))
        );
        assert!(check(0.0).is_ok());
    }
}
