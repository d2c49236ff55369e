//! Expression tree for the oracle's symbolic collaborator.
//!
//! This module defines:
//! - `Expr` - The central tree node type
//! - `ExprKind` - The variants of expression nodes (Number, Symbol, Integral, etc.)
//! - `Constant` - Named transcendental and special constants
//!
//! # Architecture
//!
//! ## N-ary Sum/Product
//! Instead of binary `Add(left, right)`, we use N-ary `Sum(Vec<Arc<Expr>>)`.
//! Flattening happens automatically in constructors, so `a + b + c` is
//! `Sum([a, b, c])`. Division is a `Product` with a `Pow(_, -1)` factor and
//! subtraction is a `Sum` with a `Product(-1, _)` term.
//!
//! ## Exact numbers
//! Literals are exact rationals (`BigRational`). Witness anchors such as
//! `13/10` and `1/7` therefore survive construction unrounded, and the
//! arbitrary-precision backend can evaluate them without loss.
//!
//! ## Structural Hashing
//! Each `Expr` has a pre-computed `hash` field for O(1) equality rejection.
//! Two expressions with different hashes are definitely not equal. The same
//! hash keys the oracle's result cache.
//!
//! # Usage
//!
//! ```
//! use symb_equiv::{Assumptions, Expr, Symbol};
//!
//! let x = Symbol::new("x", Assumptions::real());
//! let expr = x.pow(2) + x.to_expr().sin();
//! assert_eq!(expr.free_symbols(), vec![x]);
//! ```

mod analysis;
mod constructors;
mod doit;

use num_rational::BigRational;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::core::symbol::Symbol;

pub use analysis::Operator;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Named constants understood by every evaluation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
    /// The imaginary unit
    I,
    /// Positive infinity
    Infinity,
    /// Negative infinity
    NegInfinity,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::I => "I",
            Self::Infinity => "oo",
            Self::NegInfinity => "-oo",
        })
    }
}

// =============================================================================
// EXPR - The main expression type
// =============================================================================

/// A symbolic mathematical expression.
///
/// Expressions are immutable; every transformation builds a new tree and
/// shares unchanged children through `Arc`.
#[derive(Debug, Clone)]
pub struct Expr {
    /// Structural hash for O(1) equality rejection
    pub(crate) hash: u64,
    /// The kind of expression (structure)
    pub(crate) kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;
    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq for Expr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// The different kinds of expression nodes.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Exact rational literal
    Number(BigRational),

    /// Inexact floating-point literal
    Float(f64),

    /// Named constant (pi, E, I, oo)
    Constant(Constant),

    /// Free variable carrying its own assumptions
    Symbol(Symbol),

    /// Function application: `sin(x)`, `re(z)`, `sqrt(2)`
    FunctionCall {
        /// Registered function name
        name: Arc<str>,
        /// Arguments in call order
        args: Vec<Arc<Expr>>,
    },

    /// N-ary sum: a + b + c
    Sum(Vec<Arc<Expr>>),

    /// N-ary product: a * b * c
    Product(Vec<Arc<Expr>>),

    /// Exponentiation: base^exponent
    Pow(Arc<Expr>, Arc<Expr>),

    /// Unevaluated definite integral. This is the deferred operation that
    /// thorough evaluation forces.
    Integral {
        /// Integrand
        integrand: Arc<Expr>,
        /// Integration variable, bound inside the integrand
        var: Symbol,
        /// Lower bound
        lower: Arc<Expr>,
        /// Upper bound
        upper: Arc<Expr>,
    },
}

// Float literals compare bitwise so that `Eq` stays lawful (NaN == NaN).
impl PartialEq for ExprKind {
    fn eq(&self, other: &Self) -> bool {
        use ExprKind::{Constant, Float, FunctionCall, Integral, Number, Pow, Product, Sum, Symbol};
        match (self, other) {
            (Number(a), Number(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Constant(a), Constant(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (
                FunctionCall { name: n1, args: a1 },
                FunctionCall { name: n2, args: a2 },
            ) => n1 == n2 && a1 == a2,
            (Sum(a), Sum(b)) | (Product(a), Product(b)) => a == b,
            (Pow(b1, e1), Pow(b2, e2)) => b1 == b2 && e1 == e2,
            (
                Integral {
                    integrand: i1,
                    var: v1,
                    lower: l1,
                    upper: u1,
                },
                Integral {
                    integrand: i2,
                    var: v2,
                    lower: l2,
                    upper: u2,
                },
            ) => v1 == v2 && i1 == i2 && l1 == l2 && u1 == u2,
            _ => false,
        }
    }
}

impl Eq for ExprKind {}

// =============================================================================
// HASHING
// =============================================================================

/// Compute the structural hash of an expression kind.
///
/// Children contribute their cached hash, so this is O(arity) rather than
/// O(tree size). Operand order is significant.
pub fn compute_expr_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    match kind {
        ExprKind::Number(n) => {
            hasher.write_u8(0);
            n.hash(&mut hasher);
        }
        ExprKind::Float(x) => {
            hasher.write_u8(1);
            hasher.write_u64(x.to_bits());
        }
        ExprKind::Constant(c) => {
            hasher.write_u8(2);
            c.hash(&mut hasher);
        }
        ExprKind::Symbol(s) => {
            hasher.write_u8(3);
            s.hash(&mut hasher);
        }
        ExprKind::FunctionCall { name, args } => {
            hasher.write_u8(4);
            name.hash(&mut hasher);
            for arg in args {
                hasher.write_u64(arg.hash);
            }
        }
        ExprKind::Sum(terms) => {
            hasher.write_u8(5);
            hasher.write_usize(terms.len());
            for term in terms {
                hasher.write_u64(term.hash);
            }
        }
        ExprKind::Product(factors) => {
            hasher.write_u8(6);
            hasher.write_usize(factors.len());
            for factor in factors {
                hasher.write_u64(factor.hash);
            }
        }
        ExprKind::Pow(base, exp) => {
            hasher.write_u8(7);
            hasher.write_u64(base.hash);
            hasher.write_u64(exp.hash);
        }
        ExprKind::Integral {
            integrand,
            var,
            lower,
            upper,
        } => {
            hasher.write_u8(8);
            hasher.write_u64(integrand.hash);
            var.hash(&mut hasher);
            hasher.write_u64(lower.hash);
            hasher.write_u64(upper.hash);
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Assumptions, Symbol};

    #[test]
    fn test_structural_equality_ignores_construction_path() {
        let x = Symbol::new("x", Assumptions::real());
        let a = Expr::sum(vec![x.to_expr(), Expr::integer(1)]);
        let b = x.to_expr() + 1;
        assert_eq!(a, b);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_operand_order_matters() {
        let x = Symbol::plain("x");
        let y = Symbol::plain("y");
        assert_ne!(x.to_expr() - y.to_expr(), y.to_expr() - x.to_expr());
    }

    #[test]
    fn test_float_nan_is_reflexive() {
        let nan = Expr::float(f64::NAN);
        assert_eq!(nan, nan.clone());
    }
}
