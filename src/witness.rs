//! Witness generation.
//!
//! A witness is a concrete exact value substituted for a variable in one
//! trial. The list for a variable covers every number tier its constraints
//! allow (integers, rationals, algebraic irrationals, transcendentals), both
//! signs when the sign is free, and zero when zero is allowed. The caller's
//! `scale` keeps lists of different variables from sharing values, so a
//! coincidental cancellation between two variables is unlikely.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use std::ops::Deref;

use tracing::trace;

use crate::Expr;
use crate::assumptions::{ConstraintRecord, Domain, Flag, VariableConstraint};

/// Ordered, duplicate-free list of witnesses for one variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessList(Vec<Expr>);

impl WitnessList {
    /// Empty list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append unless an equal witness is already present
    pub fn push(&mut self, witness: Expr) {
        if !self.0.contains(&witness) {
            self.0.push(witness);
        }
    }

    /// Consume into the underlying vector
    #[must_use]
    pub fn into_vec(self) -> Vec<Expr> {
        self.0
    }
}

impl Deref for WitnessList {
    type Target = [Expr];
    fn deref(&self) -> &[Expr] {
        &self.0
    }
}

impl FromIterator<Expr> for WitnessList {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        let mut list = Self::new();
        for w in iter {
            list.push(w);
        }
        list
    }
}

/// Build the witness list for one resolved variable at `scale`.
///
/// Real variables get the real list directly; imaginary variables get the
/// list of their coefficient times `i`; complex variables pair a real-part
/// list at `scale` with an imaginary-part list at `scale + 1`, cycling the
/// shorter one.
#[must_use]
pub fn build_witnesses(constraint: &VariableConstraint, scale: &BigRational) -> WitnessList {
    let list: WitnessList = match &constraint.domain {
        Domain::Real => real_witnesses(&constraint.record, scale),
        Domain::Imaginary { coefficient } => real_witnesses(coefficient, scale)
            .iter()
            .map(|w| Expr::product(vec![w.clone(), Expr::i()]))
            .collect(),
        Domain::Complex(parts) => {
            let re = real_witnesses(&parts.real, scale);
            let im = real_witnesses(&parts.imaginary, &(scale + BigRational::one()));
            let n = re.len().max(im.len());
            (0..n)
                .map(|k| {
                    let a = re[k % re.len()].clone();
                    let b = im[k % im.len()].clone();
                    Expr::sum(vec![a, Expr::product(vec![b, Expr::i()])])
                })
                .collect()
        }
    };
    trace!(target: "symb_equiv::witness", count = list.len(), %scale, "built witnesses");
    list
}

/// Build the list for a real-valued record.
///
/// Never empty: every consistent record admits at least one positive or
/// negative anchor.
#[must_use]
pub fn real_witnesses(record: &ConstraintRecord, scale: &BigRational) -> WitnessList {
    if record.is(Flag::Zero) {
        return std::iter::once(Expr::integer(0)).collect();
    }

    let mut anchors: Vec<Expr> = Vec::with_capacity(9);

    let integers_allowed = !record.is(Flag::Noninteger);
    let rationals_allowed = !record.is(Flag::Integer) && !record.is_not(Flag::Rational);
    let algebraics_allowed = !record.is(Flag::Rational) && !record.is_not(Flag::Algebraic);

    if integers_allowed {
        anchors.push(Expr::integer(2));
        anchors.push(Expr::integer(5));
    }
    if rationals_allowed {
        anchors.push(Expr::rational(13, 10));
        anchors.push(Expr::rational(1, 7));
    }
    if algebraics_allowed {
        anchors.push(Expr::integer(2).sqrt());
    }
    if !record.is(Flag::Algebraic) {
        anchors.push(Expr::pi());
        anchors.push(Expr::e());
    }

    let mirrored = record.is(Flag::Negative) || record.is(Flag::Nonpositive);
    if mirrored {
        anchors = anchors.into_iter().map(Expr::neg_expr).collect();
    } else if !record.is(Flag::Nonnegative) {
        let negative = if integers_allowed {
            Expr::integer(-3)
        } else if rationals_allowed {
            Expr::rational(-12, 5)
        } else if algebraics_allowed {
            Expr::neg_expr(Expr::integer(3).sqrt())
        } else {
            Expr::product(vec![Expr::rational(-3, 2), Expr::pi()])
        };
        anchors.push(negative);
    }

    let factor = Expr::from_rational(scale.clone());
    let mut list: WitnessList = anchors
        .into_iter()
        .map(|a| Expr::product(vec![factor.clone(), a]))
        .collect();

    if !record.is(Flag::Nonzero) && !record.is_not(Flag::Zero) {
        list.push(Expr::integer(0));
    }
    list
}

/// The scale used for the `k`-th variable of a comparison: `1 + 2k`
#[must_use]
pub fn scale_for(index: usize) -> BigRational {
    BigRational::from_integer(BigInt::from(index) * 2 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;
    use crate::assumptions::resolve;

    fn witnesses(decl: &Assumptions, scale: i64) -> WitnessList {
        let c = resolve(decl).unwrap();
        build_witnesses(&c, &BigRational::from_integer(BigInt::from(scale)))
    }

    #[test]
    fn test_positive_integer() {
        let w = witnesses(&Assumptions::positive().with("integer", true), 1);
        assert_eq!(&w[..], &[Expr::integer(2), Expr::integer(5)]);
    }

    #[test]
    fn test_integer_gets_negative_anchor_and_zero() {
        let w = witnesses(&Assumptions::integer(), 1);
        assert_eq!(
            &w[..],
            &[Expr::integer(2), Expr::integer(5), Expr::integer(-3), Expr::integer(0)]
        );
    }

    #[test]
    fn test_unconstrained_real() {
        let w = witnesses(&Assumptions::real(), 1);
        let expected = [
            Expr::integer(2),
            Expr::integer(5),
            Expr::rational(13, 10),
            Expr::rational(1, 7),
            Expr::integer(2).sqrt(),
            Expr::pi(),
            Expr::e(),
            Expr::integer(-3),
            Expr::integer(0),
        ];
        assert_eq!(&w[..], &expected);
    }

    #[test]
    fn test_scale_multiplies_anchors() {
        let w = witnesses(&Assumptions::positive().with("rational", true), 3);
        assert_eq!(
            &w[..],
            &[
                Expr::integer(6),
                Expr::integer(15),
                Expr::rational(39, 10),
                Expr::rational(3, 7)
            ]
        );
    }

    #[test]
    fn test_negative_mirrors_anchors() {
        let w = witnesses(&Assumptions::negative(), 1);
        assert_eq!(w.len(), 7);
        assert_eq!(w[0], Expr::integer(-2));
        assert_eq!(w[4], -Expr::integer(2).sqrt());
        assert!(!w.contains(&Expr::integer(0)));
    }

    #[test]
    fn test_nonpositive_keeps_zero() {
        let w = witnesses(&Assumptions::new().with("nonpositive", true), 1);
        assert_eq!(w.last(), Some(&Expr::integer(0)));
        assert!(!w.contains(&Expr::integer(2)));
    }

    #[test]
    fn test_zero_has_a_single_witness() {
        let w = witnesses(&Assumptions::new().with("zero", true), 1);
        assert_eq!(&w[..], &[Expr::integer(0)]);
    }

    #[test]
    fn test_transcendental_excludes_algebraic_anchors_and_zero() {
        let w = witnesses(&Assumptions::real().with("transcendental", true), 1);
        assert_eq!(
            &w[..],
            &[
                Expr::pi(),
                Expr::e(),
                Expr::product(vec![Expr::rational(-3, 2), Expr::pi()]),
            ]
        );
    }

    #[test]
    fn test_complex_pairs_parts_cyclically() {
        let w = witnesses(&Assumptions::complex(), 1);
        assert_eq!(w.len(), 9);
        assert_eq!(w[0], Expr::integer(2) + Expr::integer(4) * Expr::i());
        // both part lists end in zero, so the last pairing is plain 0
        assert_eq!(w[8], Expr::integer(0));
    }

    #[test]
    fn test_complex_with_positive_real_part() {
        let decl = Assumptions::complex().with("real_part_positive", true);
        let w = witnesses(&decl, 1);
        // imaginary part list has 9 entries, real part list 7
        assert_eq!(w.len(), 9);
        assert_eq!(w[7], Expr::integer(2) + Expr::integer(-6) * Expr::i());
    }

    #[test]
    fn test_imaginary_excludes_zero() {
        let w = witnesses(&Assumptions::imaginary(), 1);
        assert_eq!(w.len(), 8);
        assert_eq!(w[0], Expr::integer(2) * Expr::i());
        assert!(!w.contains(&Expr::integer(0)));
    }

    #[test]
    fn test_scale_for() {
        assert_eq!(scale_for(0), BigRational::one());
        assert_eq!(scale_for(2), BigRational::from_integer(BigInt::from(5)));
    }
}
