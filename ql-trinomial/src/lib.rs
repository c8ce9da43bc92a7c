//! # ql-trinomial
//!
//! Option pricing by backward induction on recombining trinomial lattices.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! ql-trinomial = "0.1"
//! ```
//!
//! ```rust
//! use ql_trinomial::methods::lattice::{
//!     AmericanVanillaOptionFunction, Dividends, OptionType, TrigeorgisLatticeSpecification,
//!     TrinomialTree,
//! };
//!
//! let put = AmericanVanillaOptionFunction::new(100.0, 1.0, OptionType::Put, 200)?;
//! let greeks = TrinomialTree::new().option_price_adjoint(
//!     &put,
//!     &TrigeorgisLatticeSpecification,
//!     100.0,
//!     0.25,
//!     0.05,
//!     &Dividends::Continuous(0.01),
//! )?;
//! assert!(greeks.value > 0.0);
//! assert!(greeks.delta < 0.0 && greeks.delta > -1.0);
//! # Ok::<(), ql_trinomial::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Numerical methods: trinomial lattices and backward induction.
pub use ql_methods as methods;
