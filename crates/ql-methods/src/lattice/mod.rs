//! Lattice methods for option pricing.
//!
//! Backward induction on recombining trinomial lattices.
//!
//! # Overview
//!
//! * [`TrinomialTree`]: the pricing engine: price, lattice Greeks and
//!   bump-and-reprice vega/rho
//! * [`LatticeSpecification`]: how a uniform lattice is shaped
//!   ([`CoxRossRubinsteinLatticeSpecification`],
//!   [`TrigeorgisLatticeSpecification`],
//!   [`EqualProbabilitiesLatticeSpecification`])
//! * [`OptionFunction`]: payoff and one-step valuation rule
//!   ([`EuropeanVanillaOptionFunction`], [`AmericanVanillaOptionFunction`],
//!   [`ConstantContinuousSingleBarrierKnockoutFunction`])
//! * [`RecombiningTrinomialTreeData`]: precomputed, possibly non-uniform
//!   trees
//! * [`LatticeSource`]: the per-layer data the induction loop consumes

pub mod dividends;
pub mod option_function;
pub mod parameters;
pub mod settings;
pub mod source;
pub mod specification;
pub mod tree_data;
pub mod trinomial_tree;

pub use dividends::{DividendSchedule, Dividends};
pub use option_function::{
    AmericanVanillaOptionFunction, BarrierType, ConstantContinuousSingleBarrierKnockoutFunction,
    EuropeanVanillaOptionFunction, OptionFunction, OptionType,
};
pub use parameters::LatticeParameters;
pub use settings::{TreeSettings, DEFAULT_BUMP};
pub use source::{LatticeSource, UniformLattice};
pub use specification::{
    CoxRossRubinsteinLatticeSpecification, EqualProbabilitiesLatticeSpecification,
    LatticeSpecification, TrigeorgisLatticeSpecification,
};
pub use tree_data::RecombiningTrinomialTreeData;
pub use trinomial_tree::{LayerOneGreeks, TrinomialTree, ValueDerivatives};
