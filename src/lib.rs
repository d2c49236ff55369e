//! Numeric Equivalence Oracle for Symbolic Expressions
//!
//! Decides whether two symbolic expressions are equal by evaluating both at
//! representative points and comparing the results to a number of
//! significant digits. The points are derived from each variable's declared
//! assumptions, so an `integer` variable is tried on integers, a `positive`
//! one never on zero, and a complex one mostly on values whose real and
//! imaginary parts are both nonzero.
//!
//! # Features
//! - Assumption inference (`positive ⇒ nonzero ⇒ real`, part constraints for
//!   complex variables)
//! - Exact witnesses across the integer, rational, algebraic and
//!   transcendental tiers
//! - Cyclic alignment of witness lists into test vectors
//! - Pluggable numeric backends: compiled complex doubles, or exact
//!   Gaussian rationals with fallback
//! - Adaptive Gauss–Kronrod quadrature for unevaluated integrals
//! - Time budget, thorough retry, result cache, counterexample records
//! - Structural removal of subterms from sums and products
//!
//! # Usage
//! ```
//! use symb_equiv::{Assumptions, EquivalenceOracle, Symbol};
//!
//! let x = Symbol::new("x", Assumptions::real());
//! let lhs = (x.to_expr() + 1).pow_of(2);
//! let rhs = x.pow(2) + 2 * x.to_expr() + 1;
//!
//! let mut oracle = EquivalenceOracle::new();
//! assert!(oracle.compare(&lhs, &rhs, &[x.clone()]).unwrap().is_none());
//!
//! let wrong = x.pow(2) + 1;
//! let record = oracle.compare(&lhs, &wrong, &[x]).unwrap().unwrap();
//! assert!(record.expr1_final != record.expr2_final);
//! ```

pub mod assumptions;
mod core;
mod error;
pub mod functions;
pub mod numeric;
pub mod oracle;
mod significance;
mod surgery;
pub mod vectors;
pub mod witness;

#[cfg(test)]
mod tests;

pub use assumptions::{Assumptions, ConstraintRecord, Flag, VariableConstraint, resolve};
pub use crate::core::{Constant, Expr, ExprKind, Operator, Symbol, compute_expr_hash, symbols};
pub use error::{AssumptionError, EvalError, OracleError};
pub use numeric::{
    ArbitraryPrecisionBackend, EvalMode, NumericBackend, NumericEvaluator, StandardBackend,
};
pub use oracle::{
    Advisory, ChangeOutcome, ComparisonRecord, EquivalenceOracle, OracleCache, Pass, Report,
    RetryPolicy,
};
pub use significance::{
    compare_to_significance, compare_to_significance_complex, convert_to_order_one,
};
pub use surgery::remove;
pub use vectors::{TestVector, build_test_vectors};
pub use witness::{WitnessList, build_witnesses};

/// Default number of significant digits two results must share
pub const DEFAULT_SIGNIFICANCE: u32 = 10;
