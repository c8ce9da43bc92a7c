//! # ql-methods
//!
//! Numerical methods for option pricing on recombining trinomial lattices.
//!
//! # Modules
//!
//! * [`lattice`]: lattice specifications, option functions, precomputed
//!   tree data and the backward-induction engine with its Greeks

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: trinomial lattices, backward induction, Greeks.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    Dividends, DividendSchedule, LatticeParameters, LatticeSpecification, OptionFunction,
    RecombiningTrinomialTreeData, TreeSettings, TrinomialTree, ValueDerivatives,
};
