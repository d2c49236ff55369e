//! Outcome types of a comparison.

use std::fmt;

use num_complex::Complex64;

use crate::core::{Expr, Symbol};
use crate::vectors::TestVector;

/// Which pass of the oracle produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Expressions evaluated as given
    Standard,
    /// Deferred operations forced before evaluation
    Thorough,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Thorough => "thorough",
        })
    }
}

/// A non-fatal observation made during a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// One of the results was exactly zero; the trial proves nothing
    InconclusiveZero {
        /// Pass of the trial
        pass: Pass,
        /// Zero-based trial index within the pass
        trial: usize,
    },
    /// One of the results was infinite or NaN; the trial proves nothing
    NonFinite {
        /// Pass of the trial
        pass: Pass,
        /// Zero-based trial index within the pass
        trial: usize,
    },
    /// The time limit ran out before all trials were run
    BudgetExhausted {
        /// Pass that was cut short
        pass: Pass,
        /// Trials completed in that pass
        trials: usize,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconclusiveZero { pass, trial } => {
                write!(f, "{pass} trial {trial}: result is exactly zero, comparison inconclusive")
            }
            Self::NonFinite { pass, trial } => {
                write!(f, "{pass} trial {trial}: result is not finite, comparison inconclusive")
            }
            Self::BudgetExhausted { pass, trials } => {
                write!(f, "time limit reached during {pass} pass after {trials} trial(s)")
            }
        }
    }
}

/// A failing trial: a counterexample or a converted evaluation error
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    /// Variables of the comparison, in order
    pub variables: Vec<Symbol>,
    /// The failing test vector
    pub vector: TestVector,
    /// First expression as passed in
    pub expr1: Expr,
    /// Second expression as passed in
    pub expr2: Expr,
    /// First expression in the form that was evaluated
    pub expr1_evaluated: Expr,
    /// Second expression in the form that was evaluated
    pub expr2_evaluated: Expr,
    /// Numeric value of the first expression, if it evaluated
    pub expr1_final: Option<Complex64>,
    /// Numeric value of the second expression, if it evaluated
    pub expr2_final: Option<Complex64>,
    /// Pass that produced the record
    pub pass: Pass,
    /// Error text when evaluation failed
    pub exception: Option<String>,
    /// Advisories collected before this trial
    pub advisories: Vec<Advisory>,
}

impl ComparisonRecord {
    /// Whether the record stands for an evaluation failure rather than a
    /// numeric discrepancy
    #[must_use]
    pub const fn is_exception(&self) -> bool {
        self.exception.is_some()
    }
}

fn write_final(f: &mut fmt::Formatter<'_>, value: Option<Complex64>) -> fmt::Result {
    match value {
        Some(z) => write!(f, "{z}"),
        None => f.write_str("<not evaluated>"),
    }
}

impl fmt::Display for ComparisonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} != {} ({} pass)", self.expr1, self.expr2, self.pass)?;
        f.write_str("  at ")?;
        for (i, (var, value)) in self.variables.iter().zip(self.vector.iter()).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var} = {value}")?;
        }
        f.write_str("\n  values: ")?;
        write_final(f, self.expr1_final)?;
        f.write_str(" vs ")?;
        write_final(f, self.expr2_final)?;
        if let Some(exception) = &self.exception {
            write!(f, "\n  exception: {exception}")?;
        }
        Ok(())
    }
}

/// Everything a comparison found
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    /// The failing trial, or `None` if every trial agreed
    pub result: Option<ComparisonRecord>,
    /// Advisories from all passes
    pub advisories: Vec<Advisory>,
    /// Number of trials run, over all passes
    pub trials: usize,
    /// Whether the thorough pass ran
    pub retried: bool,
}

impl Report {
    /// No discrepancy was found
    #[must_use]
    pub const fn is_equivalent(&self) -> bool {
        self.result.is_none()
    }
}

/// Result of [`EquivalenceOracle::change`](super::EquivalenceOracle::change)
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// The transform kept the value; holds the transformed expression
    Preserved(Expr),
    /// The transform changed the value
    Broken(Box<ComparisonRecord>),
}
