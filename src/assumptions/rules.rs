//! Implication rules between domain flags.
//!
//! Single-premise rules are also applied in contrapositive form; the
//! two-premise rules are applied forwards only.

use super::Flag::{self, *};

/// `premises => conclusion`, each side a `(flag, value)` pair
pub(super) struct Rule {
    pub premises: &'static [(Flag, bool)],
    pub conclusion: (Flag, bool),
}

/// `a => b` facts; each also yields `!b => !a`
pub(super) const IMPLICATIONS: &[((Flag, bool), (Flag, bool))] = &[
    ((Integer, true), (Rational, true)),
    ((Integer, true), (Noninteger, false)),
    ((Noninteger, true), (Real, true)),
    ((Rational, true), (Algebraic, true)),
    ((Rational, true), (Real, true)),
    ((Rational, true), (Irrational, false)),
    ((Irrational, true), (Real, true)),
    ((Irrational, true), (Noninteger, true)),
    ((Algebraic, true), (Complex, true)),
    ((Algebraic, true), (Transcendental, false)),
    ((Transcendental, true), (Complex, true)),
    ((Real, true), (Complex, true)),
    ((Real, true), (Imaginary, false)),
    ((Imaginary, true), (Complex, true)),
    ((Imaginary, true), (Zero, false)),
    ((Positive, true), (Nonnegative, true)),
    ((Positive, true), (Nonzero, true)),
    ((Positive, true), (Negative, false)),
    ((Positive, true), (Nonpositive, false)),
    ((Negative, true), (Nonpositive, true)),
    ((Negative, true), (Nonzero, true)),
    ((Negative, true), (Nonnegative, false)),
    ((Nonnegative, true), (Real, true)),
    ((Nonpositive, true), (Real, true)),
    ((Nonzero, true), (Real, true)),
    ((Nonzero, true), (Zero, false)),
    ((Zero, true), (Integer, true)),
    ((Zero, true), (Nonnegative, true)),
    ((Zero, true), (Nonpositive, true)),
];

/// Rules with more than one premise
pub(super) const COMPOUND: &[Rule] = &[
    Rule {
        premises: &[(Real, true), (Integer, false)],
        conclusion: (Noninteger, true),
    },
    Rule {
        premises: &[(Real, true), (Rational, false)],
        conclusion: (Irrational, true),
    },
    Rule {
        premises: &[(Nonnegative, true), (Nonzero, true)],
        conclusion: (Positive, true),
    },
    Rule {
        premises: &[(Nonpositive, true), (Nonzero, true)],
        conclusion: (Negative, true),
    },
    Rule {
        premises: &[(Nonnegative, true), (Nonpositive, true)],
        conclusion: (Zero, true),
    },
    Rule {
        premises: &[(Real, true), (Zero, false)],
        conclusion: (Nonzero, true),
    },
];
