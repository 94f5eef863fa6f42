//! Symbol table, sandbox, and numeric evaluation for calcplot expressions.
//!
//! An expression moves through this crate in three steps:
//!
//! 1. [`SymbolTable`](symbols::SymbolTable) defines which functions and constants exist.
//! 2. [`Sandbox`](sandbox::Sandbox) parses a normalized expression and rejects every node that is
//!    not plain arithmetic over the table's symbols and the variable `x`.
//! 3. [`evaluate_scalar`](eval::evaluate_scalar) and
//!    [`evaluate_pointwise`](eval::evaluate_pointwise) compute the value of a validated tree,
//!    once or over a [`SampleDomain`](domain::SampleDomain).

pub mod domain;
pub mod eval;
pub mod sandbox;
pub mod symbols;

pub use domain::{SampleDomain, DEFAULT_SAMPLES};
pub use eval::{evaluate_pointwise, evaluate_scalar};
pub use sandbox::{Sandbox, UnsafeExpression, ValidatedTree};
pub use symbols::SymbolTable;
