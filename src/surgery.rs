//! Structural removal of subterms.
//!
//! Removal only makes sense where a term is one operand among several of a
//! sum or product; elsewhere the tree keeps its shape and removal recurses
//! into the operands.

use crate::core::{Expr, ExprKind};

/// Remove every target, left to right, from the additive and multiplicative
/// contexts of `expr`.
///
/// A sum or product drops each direct operand equal to the target and
/// recurses into the rest; the node is rebuilt through its constructor, so a
/// sum or product left with one operand collapses to it. Atoms are returned
/// unchanged, which means a later target equal to that remaining operand is
/// not removed.
///
/// ```
/// use symb_equiv::{Assumptions, Symbol, remove};
///
/// let x = Symbol::new("x", Assumptions::real());
/// let y = Symbol::new("y", Assumptions::real());
/// let z = Symbol::new("z", Assumptions::real());
/// let xyz = x.to_expr() * y.to_expr() * z.to_expr();
/// assert_eq!(remove(&xyz, &[x.to_expr(), y.to_expr()]), z.to_expr());
/// ```
#[must_use]
pub fn remove(expr: &Expr, targets: &[Expr]) -> Expr {
    targets
        .iter()
        .fold(expr.clone(), |acc, target| remove_one(&acc, target))
}

fn remove_one(expr: &Expr, target: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Sum(items) | ExprKind::Product(items) => {
            let kept = items
                .iter()
                .filter(|item| item.as_ref() != target)
                .map(|item| remove_one(item, target))
                .collect();
            expr.rebuild(kept)
        }
        _ if expr.is_atom() => expr.clone(),
        _ => expr.map_operands(|operand| remove_one(operand, target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Assumptions, Symbol};

    fn real(name: &str) -> Expr {
        Symbol::new(name, Assumptions::real()).to_expr()
    }

    #[test]
    fn test_remove_factors_in_turn() {
        let (x, y, z) = (real("x"), real("y"), real("z"));
        let xyz = x.clone() * y.clone() * z.clone();
        assert_eq!(remove(&xyz, &[x, y]), z);
    }

    #[test]
    fn test_remove_inside_denominator() {
        let (a, b, c) = (real("a"), real("b"), real("c"));
        let expr = a.clone() / (b.clone() + c.clone());
        assert_eq!(remove(&expr, &[b]), a / c);
    }

    #[test]
    fn test_remove_under_integral() {
        let x = Symbol::new("x", Assumptions::real());
        let a = real("a");
        let a_pow = Expr::pow(a.clone(), Expr::integer(-4));
        let body = x.pow(2) * a_pow.clone();
        let expr = Expr::integral(body, x.clone(), Expr::integer(0), a);
        let expected = Expr::integral(x.pow(2), x, Expr::integer(0), real("a"));
        assert_eq!(remove(&expr, &[a_pow]), expected);
    }

    #[test]
    fn test_last_operand_survives_as_atom() {
        let (x, y) = (real("x"), real("y"));
        assert_eq!(remove(&(x.clone() * y.clone()), &[x.clone(), y.clone()]), y);
        assert_eq!(remove(&(x.clone() + y.clone()), &[y.clone(), x.clone()]), x);
    }

    #[test]
    fn test_atoms_unchanged() {
        let x = real("x");
        assert_eq!(remove(&x, &[x.clone()]), x);
    }
}
