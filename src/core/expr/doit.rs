//! Forced evaluation of deferred operations.
//!
//! `doit` rewrites unevaluated integrals into closed form where a simple
//! antiderivative exists and leaves the rest in place for quadrature.

use num_bigint::BigInt;
use num_rational::BigRational;

use super::{Constant, Expr, ExprKind};
use crate::core::symbol::Symbol;

impl Expr {
    /// Force deferred operations, bottom-up.
    ///
    /// Integrals are split over sums, constant factors are pulled out, and
    /// polynomial monomials in the integration variable are integrated exactly
    /// over finite bounds. Whatever does not fit those rules stays an integral.
    /// Idempotent: forcing an already forced tree returns it unchanged.
    #[must_use]
    pub fn doit(&self) -> Self {
        match &self.kind {
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let body = integrand.doit();
                integrate(&body, var, &lower.doit(), &upper.doit())
            }
            _ if self.is_atom() => self.clone(),
            _ => self.map_operands(Self::doit),
        }
    }
}

fn is_finite_bound(bound: &Expr) -> bool {
    !bound.is_constant(Constant::Infinity) && !bound.is_constant(Constant::NegInfinity)
}

fn integrate(body: &Expr, var: &Symbol, lower: &Expr, upper: &Expr) -> Expr {
    if body.is_zero() {
        return Expr::integer(0);
    }

    match &body.kind {
        ExprKind::Sum(terms) => {
            return Expr::sum(
                terms
                    .iter()
                    .map(|t| integrate(t, var, lower, upper))
                    .collect(),
            );
        }
        ExprKind::Product(factors) => {
            let (constant, dependent): (Vec<Expr>, Vec<Expr>) = factors
                .iter()
                .map(|f| f.as_ref().clone())
                .partition(|f| !f.contains_symbol(var));
            if !constant.is_empty() && !dependent.is_empty() {
                let inner = integrate(&Expr::product(dependent), var, lower, upper);
                let mut out = constant;
                out.push(inner);
                return Expr::product(out);
            }
        }
        _ => {}
    }

    let finite = is_finite_bound(lower) && is_finite_bound(upper);

    if finite && !body.contains_symbol(var) {
        return Expr::product(vec![
            body.clone(),
            Expr::sub_expr(upper.clone(), lower.clone()),
        ]);
    }

    if finite {
        if let Some(power) = monomial_power(body, var) {
            let next = power + 1;
            let antiderivative = |at: &Expr| Expr::pow(at.clone(), Expr::integer(next));
            return Expr::product(vec![
                Expr::from_rational(BigRational::new(BigInt::from(1), BigInt::from(next))),
                Expr::sub_expr(antiderivative(upper), antiderivative(lower)),
            ]);
        }
    }

    Expr::integral(body.clone(), var.clone(), lower.clone(), upper.clone())
}

/// `Some(n)` when `body` is `var` or `var^n` with `n` a non-negative integer
fn monomial_power(body: &Expr, var: &Symbol) -> Option<i64> {
    match &body.kind {
        ExprKind::Symbol(s) if s == var => Some(1),
        ExprKind::Pow(base, exp) => {
            let is_var = base.as_symbol().is_some_and(|s| s == var);
            exp.as_integer().filter(|n| is_var && *n >= 0 && *n < i64::MAX)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;

    #[test]
    fn test_constant_integrand() {
        let x = Symbol::new("x", Assumptions::real());
        let z = Symbol::new("z", Assumptions::complex());
        let int = Expr::integral(z.to_expr().im(), x, Expr::integer(-1), Expr::integer(1));
        let forced = int.doit();
        assert!(!forced.has_deferred());
        assert_eq!(forced, Expr::product(vec![z.to_expr().im(), Expr::integer(2)]));
    }

    #[test]
    fn test_polynomial_integrand() {
        let x = Symbol::new("x", Assumptions::real());
        let int = Expr::integral(x.pow(2), x, Expr::integer(0), Expr::integer(3));
        assert_eq!(int.doit(), Expr::integer(9));
    }

    #[test]
    fn test_linearity_and_constant_factors() {
        let x = Symbol::new("x", Assumptions::real());
        let a = Symbol::new("a", Assumptions::positive());
        let body = Expr::sum(vec![
            Expr::product(vec![a.to_expr(), x.to_expr()]),
            Expr::integer(1),
        ]);
        let int = Expr::integral(body, x, Expr::integer(0), Expr::integer(2));
        // a * (2^2 - 0^2)/2 + 2
        let expected = Expr::sum(vec![
            Expr::product(vec![a.to_expr(), Expr::integer(2)]),
            Expr::integer(2),
        ]);
        assert_eq!(int.doit(), expected);
    }

    #[test]
    fn test_unknown_integrand_stays_deferred() {
        let x = Symbol::new("x", Assumptions::real());
        let int = Expr::integral(
            x.to_expr().pow_of(2).exp(),
            x,
            Expr::neg_infinity(),
            Expr::infinity(),
        );
        let forced = int.doit();
        assert!(forced.has_deferred());
        assert_eq!(forced.doit(), forced);
    }
}
