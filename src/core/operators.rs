//! Operator overloading for ergonomic expression building.
//!
//! Every combination of `Expr`, `&Expr`, `Symbol`, `&Symbol` and `i32`
//! lowers to the n-ary constructors, so `2 * (n + z)` builds
//! `Product([2, Sum([n, z])])`. Only one integer type takes part so that a
//! bare literal operand is never ambiguous; wider integers go through
//! [`Expr::integer`].

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::core::expr::Expr;
use crate::core::symbol::Symbol;

// ===== Macro for generating operator implementations =====
// Both sides go through `Expr::from`, so any pair with a `From` impl works.

macro_rules! impl_binary_ops {
    ($($lhs:ty, $rhs:ty);* $(;)?) => {
        $(
            impl Add<$rhs> for $lhs {
                type Output = Expr;
                fn add(self, rhs: $rhs) -> Expr {
                    Expr::sum(vec![Expr::from(self), Expr::from(rhs)])
                }
            }
            impl Sub<$rhs> for $lhs {
                type Output = Expr;
                fn sub(self, rhs: $rhs) -> Expr {
                    Expr::sub_expr(Expr::from(self), Expr::from(rhs))
                }
            }
            impl Mul<$rhs> for $lhs {
                type Output = Expr;
                fn mul(self, rhs: $rhs) -> Expr {
                    Expr::product(vec![Expr::from(self), Expr::from(rhs)])
                }
            }
            impl Div<$rhs> for $lhs {
                type Output = Expr;
                fn div(self, rhs: $rhs) -> Expr {
                    Expr::div_expr(Expr::from(self), Expr::from(rhs))
                }
            }
        )*
    };
}

// Expr operations
impl_binary_ops! {
    Expr, Expr;
    Expr, &Expr;
    &Expr, Expr;
    &Expr, &Expr;
    Expr, i32;
    &Expr, i32;
    i32, Expr;
    i32, &Expr;
}

// Symbol operations
impl_binary_ops! {
    Symbol, Symbol;
    &Symbol, &Symbol;
    Symbol, Expr;
    &Symbol, Expr;
    Expr, Symbol;
    Expr, &Symbol;
    Symbol, i32;
    &Symbol, i32;
    i32, Symbol;
    i32, &Symbol;
}

// Negation
impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg_expr(self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg_expr(self.clone())
    }
}

impl Neg for Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg_expr(self.to_expr())
    }
}

impl Neg for &Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg_expr(self.to_expr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;

    #[test]
    fn test_integer_literal_operands() {
        let n = Symbol::new("n", Assumptions::positive());
        let z = Symbol::new("z", Assumptions::complex());
        let factored = 2 * (n.to_expr() + z.to_expr());
        assert_eq!(
            factored,
            Expr::product(vec![Expr::integer(2), Expr::sum(vec![n.to_expr(), z.to_expr()])])
        );
        assert_eq!(2 * &n - 1, Expr::sum(vec![Expr::integer(-1), 2 * n.to_expr()]));
    }

    #[test]
    fn test_method_call_on_literal_sum() {
        let x = Symbol::new("x", Assumptions::real());
        let squared = (x.to_expr() + 1).pow_of(2);
        assert_eq!(squared, Expr::pow(x.to_expr() + 1, Expr::integer(2)));
        assert_eq!(x.to_expr() / 1, x.to_expr());
    }
}
