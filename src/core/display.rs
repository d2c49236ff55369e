//! Display formatting for expressions.
//!
//! Output is plain infix text in the style of an algebra system's `str()`:
//! `2*n + 2*z`, `a/(b + c)`, `Integral(x**2, (x, 0, 1))`. It is used in
//! comparison records and log lines, so it favours readability over
//! round-trippable syntax.

use std::fmt;

use num_rational::BigRational;
use num_traits::{One, Signed};

use crate::core::expr::{Expr, ExprKind};

/// Binding strength of a node when printed as an operand
fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Sum(_) => 1,
        ExprKind::Product(_) => 2,
        ExprKind::Number(n) if !n.is_integer() || n.is_negative() => 2,
        ExprKind::Float(x) if *x < 0.0 => 2,
        ExprKind::Pow(..) => 3,
        _ => 4,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    if precedence(expr) < min_prec {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// A factor that belongs in a denominator: `b^-n` yields `b^n`
fn as_denominator(factor: &Expr) -> Option<Expr> {
    if let ExprKind::Pow(base, exp) = &factor.kind {
        if exp.has_negative_coefficient() {
            return Some(Expr::pow(
                base.as_ref().clone(),
                Expr::neg_expr(exp.as_ref().clone()),
            ));
        }
    }
    None
}

fn write_factors(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            f.write_str("*")?;
        }
        write_operand(f, factor, 3)?;
    }
    Ok(())
}

fn write_product(f: &mut fmt::Formatter<'_>, factors: &[&Expr]) -> fmt::Result {
    let mut numer: Vec<Expr> = Vec::new();
    let mut denom: Vec<Expr> = Vec::new();

    for (i, factor) in factors.iter().enumerate() {
        if i == 0 {
            if let Some(n) = factor.as_number() {
                if n == &-BigRational::one() {
                    f.write_str("-")?;
                    continue;
                }
                if !n.is_integer() {
                    write!(f, "({factor})")?;
                    if factors.len() > 1 {
                        f.write_str("*")?;
                    }
                    continue;
                }
            }
        }
        match as_denominator(factor) {
            Some(d) => denom.push(d),
            None => numer.push((*factor).clone()),
        }
    }

    if numer.is_empty() {
        f.write_str("1")?;
    } else {
        write_factors(f, &numer)?;
    }
    if !denom.is_empty() {
        f.write_str("/")?;
        if denom.len() == 1 {
            write_operand(f, &denom[0], 3)?;
        } else {
            f.write_str("(")?;
            write_factors(f, &denom)?;
            f.write_str(")")?;
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => {
                if n.is_integer() {
                    write!(f, "{}", n.numer())
                } else {
                    write!(f, "{}/{}", n.numer(), n.denom())
                }
            }
            ExprKind::Float(x) => write!(f, "{x:?}"),
            ExprKind::Constant(c) => write!(f, "{c}"),
            ExprKind::Symbol(s) => write!(f, "{s}"),
            ExprKind::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            ExprKind::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        write!(f, "{term}")?;
                    } else if term.has_negative_coefficient() {
                        let flipped = Expr::neg_expr(term.as_ref().clone());
                        f.write_str(" - ")?;
                        write_operand(f, &flipped, 2)?;
                    } else {
                        f.write_str(" + ")?;
                        write!(f, "{term}")?;
                    }
                }
                Ok(())
            }
            ExprKind::Product(factors) => {
                let refs: Vec<&Expr> = factors.iter().map(std::sync::Arc::as_ref).collect();
                write_product(f, &refs)
            }
            ExprKind::Pow(base, exp) => {
                if exp.as_number().is_some_and(|n| *n == BigRational::new(1.into(), 2.into())) {
                    return write!(f, "sqrt({base})");
                }
                if exp.has_negative_coefficient() {
                    return write_product(f, &[self]);
                }
                write_operand(f, base, 4)?;
                f.write_str("**")?;
                write_operand(f, exp, 4)
            }
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => write!(f, "Integral({integrand}, ({var}, {lower}, {upper}))"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Assumptions, Expr, Symbol};

    #[test]
    fn test_display_sum_and_difference() {
        let x = Symbol::plain("x");
        let y = Symbol::plain("y");
        assert_eq!((x.to_expr() - y.to_expr()).to_string(), "x - y");
        assert_eq!((2 * x.to_expr() + 1).to_string(), "1 + 2*x");
    }

    #[test]
    fn test_display_division() {
        let a = Symbol::plain("a");
        let b = Symbol::plain("b");
        let c = Symbol::plain("c");
        let e = a.to_expr() / (b.to_expr() + c.to_expr());
        assert_eq!(e.to_string(), "a/(b + c)");
        assert_eq!((1 / a.to_expr()).to_string(), "1/a");
    }

    #[test]
    fn test_display_integral() {
        let x = Symbol::new("x", Assumptions::real());
        let e = Expr::integral(x.pow(2), x, Expr::integer(0), Expr::infinity());
        assert_eq!(e.to_string(), "Integral(x**2, (x, 0, oo))");
    }

    #[test]
    fn test_display_complex_witness() {
        let w = Expr::integer(2) + Expr::integer(4) * Expr::i();
        assert_eq!(w.to_string(), "2 + 4*I");
        assert_eq!(Expr::neg_expr(Expr::integer(2).sqrt()).to_string(), "-sqrt(2)");
    }
}
