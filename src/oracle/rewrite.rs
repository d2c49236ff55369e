//! Bound rewrites applied before comparing over non-real variables.

use crate::core::{Constant, Expr, ExprKind};

/// Replace whole-line integration ranges by `[-1, 1]`.
///
/// `(-oo, oo)` becomes `(-1, 1)` and `(oo, -oo)` becomes `(1, -1)`, in every
/// integral of the tree. The integrand and every other range are left as
/// they are. The resulting value is generally different; both sides of a
/// comparison get the same rewrite.
#[must_use]
pub fn rewrite_infinite_integrals(expr: &Expr) -> Expr {
    if expr.is_atom() {
        return expr.clone();
    }
    if let ExprKind::Integral {
        integrand,
        var,
        lower,
        upper,
    } = expr.kind()
    {
        let replacement = match (lower.kind(), upper.kind()) {
            (
                ExprKind::Constant(Constant::NegInfinity),
                ExprKind::Constant(Constant::Infinity),
            ) => Some((-1, 1)),
            (
                ExprKind::Constant(Constant::Infinity),
                ExprKind::Constant(Constant::NegInfinity),
            ) => Some((1, -1)),
            _ => None,
        };
        if let Some((lo, hi)) = replacement {
            return Expr::integral(
                rewrite_infinite_integrals(integrand),
                var.clone(),
                Expr::integer(lo),
                Expr::integer(hi),
            );
        }
    }
    expr.map_operands(rewrite_infinite_integrals)
}
