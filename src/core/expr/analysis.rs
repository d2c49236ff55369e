//! Structural queries and generic rebuilding.
//!
//! `operands` and `rebuild` are inverse to each other: every node can be
//! taken apart and put back together through its own constructor, which is
//! what tree surgery and the bound rewrites rely on.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::{Expr, ExprKind};
use crate::core::symbol::Symbol;

/// The kind of operation at the root of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Commutative n-ary sum
    Add,
    /// Commutative n-ary product
    Mul,
    /// Exponentiation
    Pow,
    /// Anything else (function call, integral, atom)
    Other,
}

impl Expr {
    /// Root operator of this node
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match &self.kind {
            ExprKind::Sum(_) => Operator::Add,
            ExprKind::Product(_) => Operator::Mul,
            ExprKind::Pow(..) => Operator::Pow,
            _ => Operator::Other,
        }
    }

    /// True for nodes without operands (numbers, constants, symbols)
    #[inline]
    #[must_use]
    pub const fn is_atom(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Number(_) | ExprKind::Float(_) | ExprKind::Constant(_) | ExprKind::Symbol(_)
        )
    }

    /// Direct operands in structural order.
    ///
    /// For an integral these are the integrand, the lower and the upper bound;
    /// the bound variable is part of the node itself.
    #[must_use]
    pub fn operands(&self) -> Vec<&Self> {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Float(_) | ExprKind::Constant(_) | ExprKind::Symbol(_) => {
                Vec::new()
            }
            ExprKind::FunctionCall { args, .. } => args.iter().map(Arc::as_ref).collect(),
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                items.iter().map(Arc::as_ref).collect()
            }
            ExprKind::Pow(base, exp) => vec![base.as_ref(), exp.as_ref()],
            ExprKind::Integral {
                integrand,
                lower,
                upper,
                ..
            } => vec![integrand.as_ref(), lower.as_ref(), upper.as_ref()],
        }
    }

    /// Rebuild this node from new operands with the node's own constructor.
    ///
    /// Atoms ignore `operands`. If the operand count does not fit the node
    /// shape (a power needs two, an integral three) the node is returned
    /// unchanged.
    #[must_use]
    pub fn rebuild(&self, operands: Vec<Self>) -> Self {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Float(_) | ExprKind::Constant(_) | ExprKind::Symbol(_) => {
                self.clone()
            }
            ExprKind::FunctionCall { name, .. } => Self::func(name.as_ref(), operands),
            ExprKind::Sum(_) => Self::sum(operands),
            ExprKind::Product(_) => Self::product(operands),
            ExprKind::Pow(..) => match <[Self; 2]>::try_from(operands) {
                Ok([base, exp]) => Self::pow(base, exp),
                Err(_) => self.clone(),
            },
            ExprKind::Integral { var, .. } => match <[Self; 3]>::try_from(operands) {
                Ok([integrand, lower, upper]) => Self::integral(integrand, var.clone(), lower, upper),
                Err(_) => self.clone(),
            },
        }
    }

    /// Apply `f` to every direct operand and rebuild
    #[must_use]
    pub fn map_operands<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Self) -> Self,
    {
        if self.is_atom() {
            return self.clone();
        }
        let mapped = self.operands().into_iter().map(&mut f).collect();
        self.rebuild(mapped)
    }

    /// Free symbols in order of first appearance.
    ///
    /// An integral's variable is bound inside its integrand, so it only
    /// counts as free where it appears in the bounds.
    #[must_use]
    pub fn free_symbols(&self) -> Vec<Symbol> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        collect_free(self, &[], &mut seen, &mut out);
        out
    }

    /// Check whether `symbol` occurs free in this expression
    #[must_use]
    pub fn contains_symbol(&self, symbol: &Symbol) -> bool {
        match &self.kind {
            ExprKind::Symbol(s) => s == symbol,
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                (var != symbol && integrand.contains_symbol(symbol))
                    || lower.contains_symbol(symbol)
                    || upper.contains_symbol(symbol)
            }
            _ => self.operands().iter().any(|op| op.contains_symbol(symbol)),
        }
    }

    /// True when the tree contains an unevaluated integral
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        match &self.kind {
            ExprKind::Integral { .. } => true,
            _ => self.operands().iter().any(|op| op.has_deferred()),
        }
    }

    /// Total number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.operands().iter().map(|op| op.node_count()).sum::<usize>()
    }

    /// Replace every free occurrence of `symbol` with `value`
    #[must_use]
    pub fn substitute(&self, symbol: &Symbol, value: &Self) -> Self {
        match &self.kind {
            ExprKind::Symbol(s) if s == symbol => value.clone(),
            _ if self.is_atom() => self.clone(),
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let body = if var == symbol {
                    integrand.as_ref().clone()
                } else {
                    integrand.substitute(symbol, value)
                };
                Self::integral(
                    body,
                    var.clone(),
                    lower.substitute(symbol, value),
                    upper.substitute(symbol, value),
                )
            }
            _ => self.map_operands(|op| op.substitute(symbol, value)),
        }
    }
}

fn collect_free(
    expr: &Expr,
    bound: &[&Symbol],
    seen: &mut FxHashSet<Symbol>,
    out: &mut Vec<Symbol>,
) {
    match &expr.kind {
        ExprKind::Symbol(s) => {
            if !bound.contains(&s) && seen.insert(s.clone()) {
                out.push(s.clone());
            }
        }
        ExprKind::Integral {
            integrand,
            var,
            lower,
            upper,
        } => {
            let mut inner: Vec<&Symbol> = bound.to_vec();
            inner.push(var);
            collect_free(integrand, &inner, seen, out);
            collect_free(lower, bound, seen, out);
            collect_free(upper, bound, seen, out);
        }
        _ => {
            for op in expr.operands() {
                collect_free(op, bound, seen, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;

    #[test]
    fn test_free_symbols_respects_binding() {
        let x = Symbol::new("x", Assumptions::real());
        let a = Symbol::new("a", Assumptions::positive());
        let body = Expr::product(vec![a.to_expr(), x.to_expr()]);
        let int = Expr::integral(body, x.clone(), Expr::integer(0), x.to_expr());
        // x is bound in the integrand but free in the upper bound
        assert_eq!(int.free_symbols(), vec![a, x]);
    }

    #[test]
    fn test_rebuild_round_trips() {
        let x = Symbol::plain("x");
        let e = Expr::pow(x.to_expr() + 1, Expr::integer(3));
        let ops: Vec<Expr> = e.operands().into_iter().cloned().collect();
        assert_eq!(e.rebuild(ops), e);
        assert_eq!(e.operator(), Operator::Pow);
    }

    #[test]
    fn test_substitute_skips_bound_variable() {
        let x = Symbol::new("x", Assumptions::real());
        let int = Expr::integral(x.to_expr(), x.clone(), Expr::integer(0), Expr::integer(1));
        assert_eq!(int.substitute(&x, &Expr::integer(5)), int);
        assert!(int.has_deferred());
    }
}
