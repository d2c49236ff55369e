//! Expression constructors.
//!
//! Provides all constructor methods for building expressions. The n-ary
//! constructors flatten nested nodes and fold exact numeric operands, which is
//! the only normalization the tree performs.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::Arc;

use super::{Constant, Expr, ExprKind, compute_expr_hash};
use crate::core::symbol::Symbol;

/// Exact integer powers larger than this stay symbolic.
const MAX_FOLDED_EXPONENT: u64 = 256;

impl Expr {
    /// Create a new expression from its kind
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        let hash = compute_expr_hash(&kind);
        Self { hash, kind }
    }

    /// Get the structural hash of the expression
    #[inline]
    #[must_use]
    pub const fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Borrow the node kind
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ExprKind {
        &self.kind
    }

    // -------------------------------------------------------------------------
    // Accessor methods
    // -------------------------------------------------------------------------

    /// The exact value of a numeric literal
    #[inline]
    #[must_use]
    pub const fn as_number(&self) -> Option<&BigRational> {
        match &self.kind {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The symbol, if this node is a bare symbol
    #[inline]
    #[must_use]
    pub const fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this expression is the exact number zero
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Zero::is_zero)
    }

    /// Check if this expression is the exact number one
    #[inline]
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(One::is_one)
    }

    /// The integer value of an exact integral literal, if it fits in `i64`
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number()
            .filter(|n| n.is_integer())
            .and_then(|n| n.to_integer().to_i64())
    }

    /// Check if this node is the given constant
    #[inline]
    #[must_use]
    pub fn is_constant(&self, constant: Constant) -> bool {
        matches!(self.kind, ExprKind::Constant(c) if c == constant)
    }

    // -------------------------------------------------------------------------
    // Basic constructors
    // -------------------------------------------------------------------------

    /// Exact integer literal
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::new(ExprKind::Number(BigRational::from_integer(BigInt::from(n))))
    }

    /// Exact rational literal `numer/denom`.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    #[must_use]
    pub fn rational(numer: i64, denom: i64) -> Self {
        Self::from_rational(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    /// Exact literal from an existing rational
    #[must_use]
    pub fn from_rational(value: BigRational) -> Self {
        Self::new(ExprKind::Number(value))
    }

    /// Inexact floating-point literal
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::new(ExprKind::Float(value))
    }

    /// Named constant
    #[must_use]
    pub fn constant(constant: Constant) -> Self {
        Self::new(ExprKind::Constant(constant))
    }

    /// π
    #[must_use]
    pub fn pi() -> Self {
        Self::constant(Constant::Pi)
    }

    /// Euler's number
    #[must_use]
    pub fn e() -> Self {
        Self::constant(Constant::E)
    }

    /// The imaginary unit
    #[must_use]
    pub fn i() -> Self {
        Self::constant(Constant::I)
    }

    /// Positive infinity, used as an integration bound
    #[must_use]
    pub fn infinity() -> Self {
        Self::constant(Constant::Infinity)
    }

    /// Negative infinity, used as an integration bound
    #[must_use]
    pub fn neg_infinity() -> Self {
        Self::constant(Constant::NegInfinity)
    }

    /// Symbol reference
    #[must_use]
    pub fn symbol(symbol: Symbol) -> Self {
        Self::new(ExprKind::Symbol(symbol))
    }

    /// Function call by registered name
    #[must_use]
    pub fn func(name: impl AsRef<str>, args: Vec<Self>) -> Self {
        Self::new(ExprKind::FunctionCall {
            name: Arc::from(name.as_ref()),
            args: args.into_iter().map(Arc::new).collect(),
        })
    }

    /// Unevaluated definite integral of `integrand` over `var` from `lower` to `upper`
    #[must_use]
    pub fn integral(integrand: Self, var: Symbol, lower: Self, upper: Self) -> Self {
        Self::new(ExprKind::Integral {
            integrand: Arc::new(integrand),
            var,
            lower: Arc::new(lower),
            upper: Arc::new(upper),
        })
    }

    // -------------------------------------------------------------------------
    // N-ary arithmetic
    // -------------------------------------------------------------------------

    /// Create a sum, flattening nested sums and folding exact numbers.
    ///
    /// The folded numeric term goes first; zero is dropped. An empty sum is 0
    /// and a single remaining term is returned as is.
    #[must_use]
    pub fn sum(terms: Vec<Self>) -> Self {
        let mut constant = BigRational::zero();
        let mut flat: Vec<Arc<Self>> = Vec::with_capacity(terms.len());

        for term in terms {
            match term.kind {
                ExprKind::Number(n) => constant += n,
                ExprKind::Sum(inner) => {
                    for t in inner {
                        if let ExprKind::Number(n) = &t.kind {
                            constant += n;
                        } else {
                            flat.push(t);
                        }
                    }
                }
                _ => flat.push(Arc::new(term)),
            }
        }

        if !constant.is_zero() {
            flat.insert(0, Arc::new(Self::from_rational(constant)));
        }

        match flat.len() {
            0 => Self::integer(0),
            1 => Arc::unwrap_or_clone(flat.remove(0)),
            _ => Self::new(ExprKind::Sum(flat)),
        }
    }

    /// Create a product, flattening nested products and folding exact numbers.
    ///
    /// A zero coefficient collapses the product to 0, a unit coefficient is
    /// dropped. An empty product is 1.
    #[must_use]
    pub fn product(factors: Vec<Self>) -> Self {
        let mut coeff = BigRational::one();
        let mut flat: Vec<Arc<Self>> = Vec::with_capacity(factors.len());

        for factor in factors {
            match factor.kind {
                ExprKind::Number(n) => coeff *= n,
                ExprKind::Product(inner) => {
                    for f in inner {
                        if let ExprKind::Number(n) = &f.kind {
                            coeff *= n;
                        } else {
                            flat.push(f);
                        }
                    }
                }
                _ => flat.push(Arc::new(factor)),
            }
        }

        if coeff.is_zero() {
            return Self::integer(0);
        }
        if !coeff.is_one() {
            flat.insert(0, Arc::new(Self::from_rational(coeff)));
        }

        match flat.len() {
            0 => Self::integer(1),
            1 => Arc::unwrap_or_clone(flat.remove(0)),
            _ => Self::new(ExprKind::Product(flat)),
        }
    }

    /// Create a power.
    ///
    /// Trivial exponents fold (`b^1 = b`, `b^0 = 1`, `1^e = 1`), exact
    /// numbers raised to small integer powers fold, and `(b^m)^n` with
    /// integer `n` becomes `b^(m*n)`.
    #[must_use]
    pub fn pow(base: Self, exponent: Self) -> Self {
        if exponent.is_one() {
            return base;
        }
        if exponent.is_zero() || base.is_one() {
            return Self::integer(1);
        }

        if let Some(n) = exponent.as_integer() {
            if let ExprKind::Number(b) = &base.kind {
                let foldable = n.unsigned_abs() <= MAX_FOLDED_EXPONENT && (n > 0 || !b.is_zero());
                if foldable {
                    if let Ok(k) = i32::try_from(n) {
                        return Self::from_rational(b.pow(k));
                    }
                }
            }
            if let ExprKind::Pow(inner_base, inner_exp) = &base.kind {
                let combined = Self::product(vec![
                    inner_exp.as_ref().clone(),
                    Self::integer(n),
                ]);
                return Self::pow(inner_base.as_ref().clone(), combined);
            }
        }

        Self::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Raise to a power (method form)
    #[must_use]
    pub fn pow_of(self, exponent: impl Into<Self>) -> Self {
        Self::pow(self, exponent.into())
    }

    /// Negation, represented as `-1 * expr`
    #[must_use]
    pub fn neg_expr(expr: Self) -> Self {
        match expr.kind {
            ExprKind::Constant(Constant::Infinity) => Self::neg_infinity(),
            ExprKind::Constant(Constant::NegInfinity) => Self::infinity(),
            ExprKind::Number(n) => Self::from_rational(-n),
            _ => Self::product(vec![Self::integer(-1), expr]),
        }
    }

    /// Subtraction, represented as `a + (-1 * b)`
    #[must_use]
    pub fn sub_expr(a: Self, b: Self) -> Self {
        Self::sum(vec![a, Self::neg_expr(b)])
    }

    /// Division, represented as `a * b^-1`
    #[must_use]
    pub fn div_expr(a: Self, b: Self) -> Self {
        Self::product(vec![a, Self::pow(b, Self::integer(-1))])
    }

    /// Check whether the leading numeric factor is negative
    #[must_use]
    pub fn has_negative_coefficient(&self) -> bool {
        match &self.kind {
            ExprKind::Number(n) => n.is_negative(),
            ExprKind::Float(x) => *x < 0.0,
            ExprKind::Product(factors) => factors
                .first()
                .and_then(|f| f.as_number())
                .is_some_and(Signed::is_negative),
            _ => false,
        }
    }
}

// =============================================================================
// ELEMENTARY FUNCTIONS
// =============================================================================

macro_rules! impl_math_functions {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        impl Expr {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $name(self) -> Self {
                    Self::func(stringify!($name), vec![self])
                }
            )*
        }
    };
}

impl_math_functions! {
    /// Square root (principal branch)
    sqrt,
    /// Exponential
    exp,
    /// Natural logarithm (principal branch)
    ln,
    /// Sine
    sin,
    /// Cosine
    cos,
    /// Tangent
    tan,
    /// Hyperbolic sine
    sinh,
    /// Hyperbolic cosine
    cosh,
    /// Hyperbolic tangent
    tanh,
    /// Inverse sine
    asin,
    /// Inverse cosine
    acos,
    /// Inverse tangent
    atan,
    /// Modulus
    abs,
    /// Real part
    re,
    /// Imaginary part
    im,
    /// Complex conjugate
    conjugate,
    /// Argument (principal value)
    arg,
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Self::integer(i64::from(n))
    }
}

impl From<f64> for Expr {
    fn from(x: f64) -> Self {
        Self::float(x)
    }
}

impl From<BigRational> for Expr {
    fn from(n: BigRational) -> Self {
        Self::from_rational(n)
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Self::constant(c)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Self::symbol(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Self::symbol(s.clone())
    }
}

impl From<&Self> for Expr {
    fn from(e: &Self) -> Self {
        e.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Symbol::plain("x").to_expr()
    }

    #[test]
    fn test_sum_folds_numbers_first() {
        let s = Expr::sum(vec![x(), Expr::integer(2), Expr::rational(1, 2)]);
        match &s.kind {
            ExprKind::Sum(terms) => {
                assert_eq!(terms.len(), 2);
                assert_eq!(*terms[0], Expr::rational(5, 2));
            }
            other => panic!("expected sum, got {other:?}"),
        }
    }

    #[test]
    fn test_sum_cancels_to_single_term() {
        let s = Expr::sum(vec![Expr::integer(3), x(), Expr::integer(-3)]);
        assert_eq!(s, x());
        assert_eq!(Expr::sum(vec![]), Expr::integer(0));
    }

    #[test]
    fn test_product_zero_and_unit() {
        assert!(Expr::product(vec![x(), Expr::integer(0)]).is_zero());
        assert_eq!(Expr::product(vec![Expr::integer(1), x()]), x());
        assert!(Expr::product(vec![]).is_one());
    }

    #[test]
    fn test_nested_products_flatten() {
        let inner = Expr::product(vec![Expr::integer(2), x()]);
        let outer = Expr::product(vec![Expr::integer(3), inner]);
        assert_eq!(outer, Expr::product(vec![Expr::integer(6), x()]));
    }

    #[test]
    fn test_pow_folding() {
        assert_eq!(Expr::pow(Expr::integer(2), Expr::integer(10)), Expr::integer(1024));
        assert_eq!(Expr::pow(Expr::integer(2), Expr::integer(-1)), Expr::rational(1, 2));
        assert_eq!(x().pow_of(1), x());
        assert!(x().pow_of(0).is_one());
        // 0^-1 stays symbolic
        assert!(matches!(
            Expr::pow(Expr::integer(0), Expr::integer(-1)).kind,
            ExprKind::Pow(..)
        ));
    }

    #[test]
    fn test_pow_of_pow_combines_integer_exponents() {
        let a4 = x().pow_of(4);
        assert_eq!(a4.pow_of(-1), x().pow_of(-4));
    }

    #[test]
    fn test_neg_of_infinity() {
        assert_eq!(Expr::neg_expr(Expr::infinity()), Expr::neg_infinity());
        assert!(Expr::neg_expr(x()).has_negative_coefficient());
    }

    #[test]
    fn test_pow_with_extreme_integer_exponent_stays_symbolic() {
        let p = Expr::pow(Expr::integer(2), Expr::integer(i64::MIN));
        assert!(matches!(p.kind, ExprKind::Pow(..)));
        let q = Expr::pow(x(), Expr::integer(i64::MIN));
        assert_eq!(q.as_integer(), None);
    }
}
