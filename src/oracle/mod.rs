//! The equivalence oracle.
//!
//! Decides whether two expressions agree numerically over representative
//! test vectors built from the variables' declared assumptions. A passing
//! comparison is evidence, not proof.
//!
//! # Passes
//!
//! The standard pass evaluates both expressions as given, one vector at a
//! time, and stops at the first discrepancy. If it finds none and the
//! [`RetryPolicy`] asks for it, the thorough pass repeats every vector with
//! deferred operations (integrals) forced first.
//!
//! # Example
//! ```
//! use symb_equiv::{Assumptions, EquivalenceOracle, Symbol};
//!
//! let n = Symbol::new("n", Assumptions::positive());
//! let z = Symbol::new("z", Assumptions::complex());
//! let vars = [n.clone(), z.clone()];
//!
//! let mut oracle = EquivalenceOracle::new();
//! let factored = 2 * (n.to_expr() + z.to_expr());
//! let expanded = 2 * n.to_expr() + 2 * z.to_expr();
//! assert!(oracle.compare(&factored, &expanded, &vars).unwrap().is_none());
//!
//! let doubled = 2 * z.to_expr();
//! assert!(oracle.compare(&z.to_expr(), &doubled, &vars).unwrap().is_some());
//! ```

mod cache;
mod record;
mod rewrite;

use std::time::{Duration, Instant};

use num_complex::Complex64;
use tracing::{debug, trace, warn};

pub use cache::OracleCache;
pub use record::{Advisory, ChangeOutcome, ComparisonRecord, Pass, Report};
pub use rewrite::rewrite_infinite_integrals;

use crate::DEFAULT_SIGNIFICANCE;
use crate::assumptions::{VariableConstraint, resolve};
use crate::core::{Expr, Symbol};
use crate::error::{EvalError, OracleError};
use crate::numeric::{EvalMode, NumericBackend, NumericEvaluator};
use crate::significance::compare_to_significance_complex;
use crate::vectors::{TestVector, vectors_for_constraints};

/// When to run the thorough pass after a clean standard pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Always
    Always,
    /// Only if either expression contains a deferred operation
    #[default]
    WhenDeferred,
    /// Never
    Never,
}

/// How a pass ended
enum PassOutcome {
    Completed,
    Failed(ComparisonRecord),
    OutOfTime,
}

/// The expressions of one comparison, as passed in and as evaluated
struct Subject<'a> {
    expr1: &'a Expr,
    expr2: &'a Expr,
    lhs: &'a Expr,
    rhs: &'a Expr,
    variables: &'a [Symbol],
}

/// Numeric equivalence oracle with a content-keyed result cache.
///
/// Configured with consuming builder methods:
///
/// ```
/// use std::time::Duration;
/// use symb_equiv::{ArbitraryPrecisionBackend, EquivalenceOracle, RetryPolicy};
///
/// let oracle = EquivalenceOracle::new()
///     .significance(8)
///     .time_limit(Duration::from_secs(2))
///     .convert_exceptions(true)
///     .retry_policy(RetryPolicy::Always)
///     .backend(ArbitraryPrecisionBackend::new());
/// assert!(oracle.cache().is_empty());
/// ```
#[derive(Debug)]
pub struct EquivalenceOracle {
    time_limit: Option<Duration>,
    convert_exceptions: bool,
    significance: u32,
    retry: RetryPolicy,
    evaluator: NumericEvaluator,
    cache: OracleCache,
}

impl Default for EquivalenceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl EquivalenceOracle {
    /// Oracle with default settings: 10 significant digits, no time limit,
    /// errors propagated, standard backend, retry when deferred
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            convert_exceptions: false,
            significance: DEFAULT_SIGNIFICANCE,
            retry: RetryPolicy::default(),
            evaluator: NumericEvaluator::default(),
            cache: OracleCache::new(),
        }
    }

    /// Stop starting new trials once `limit` has elapsed
    #[must_use]
    pub const fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Turn evaluation errors into comparison records instead of errors
    #[must_use]
    pub const fn convert_exceptions(mut self, convert: bool) -> Self {
        self.convert_exceptions = convert;
        self
    }

    /// Number of significant digits that must agree
    #[must_use]
    pub const fn significance(mut self, digits: u32) -> Self {
        self.significance = digits;
        self
    }

    /// When to run the thorough pass
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Evaluate with `backend`
    #[must_use]
    pub fn backend(mut self, backend: impl NumericBackend + 'static) -> Self {
        self.evaluator = NumericEvaluator::new(backend);
        self
    }

    /// Start from an existing cache
    #[must_use]
    pub fn with_cache(mut self, cache: OracleCache) -> Self {
        self.cache = cache;
        self
    }

    /// The result cache
    #[must_use]
    pub const fn cache(&self) -> &OracleCache {
        &self.cache
    }

    /// Compare two expressions.
    ///
    /// Returns `None` if every trial agreed (or was inconclusive), otherwise
    /// the first failing trial.
    ///
    /// # Errors
    /// See [`report`](Self::report).
    pub fn compare(
        &mut self,
        expr1: &Expr,
        expr2: &Expr,
        variables: &[Symbol],
    ) -> Result<Option<ComparisonRecord>, OracleError> {
        Ok(self.report(expr1, expr2, variables)?.result)
    }

    /// Apply `transform` to `expr` and check that the value is preserved.
    ///
    /// # Errors
    /// See [`report`](Self::report).
    pub fn change<F>(
        &mut self,
        expr: &Expr,
        transform: F,
        variables: &[Symbol],
    ) -> Result<ChangeOutcome, OracleError>
    where
        F: FnOnce(&Expr) -> Expr,
    {
        let changed = transform(expr);
        Ok(match self.compare(expr, &changed, variables)? {
            None => ChangeOutcome::Preserved(changed),
            Some(record) => ChangeOutcome::Broken(Box::new(record)),
        })
    }

    /// Compare two expressions and return everything found along the way.
    ///
    /// # Errors
    /// - [`OracleError::Assumptions`] if a variable's declaration is unknown
    ///   or contradictory
    /// - [`OracleError::Evaluation`] if evaluation fails and exceptions are not
    ///   converted, or the failure is fatal (a malformed vector)
    pub fn report(
        &mut self,
        expr1: &Expr,
        expr2: &Expr,
        variables: &[Symbol],
    ) -> Result<Report, OracleError> {
        if let Some(hit) = self.cache.get(expr1, expr2, variables) {
            debug!(target: "symb_equiv::oracle", %expr1, %expr2, "cache hit");
            return Ok(hit.clone());
        }

        let constraints = variables
            .iter()
            .map(|v| resolve(v.assumptions()))
            .collect::<Result<Vec<_>, _>>()?;

        let all_real = constraints.iter().all(VariableConstraint::is_real);
        let (lhs, rhs) = if all_real {
            (expr1.clone(), expr2.clone())
        } else {
            (rewrite_infinite_integrals(expr1), rewrite_infinite_integrals(expr2))
        };

        let vectors = vectors_for_constraints(&constraints);

        let subject = Subject {
            expr1,
            expr2,
            lhs: &lhs,
            rhs: &rhs,
            variables,
        };
        let started = Instant::now();
        let mut report = Report::default();

        let mut outcome = self.run_pass(Pass::Standard, &subject, &vectors, started, &mut report)?;
        if matches!(outcome, PassOutcome::Completed) && self.should_retry(expr1, expr2) {
            report.retried = true;
            outcome = self.run_pass(Pass::Thorough, &subject, &vectors, started, &mut report)?;
        }
        if let PassOutcome::Failed(record) = outcome {
            report.result = Some(record);
        }

        self.cache
            .insert(expr1.clone(), expr2.clone(), variables.to_vec(), report.clone());
        Ok(report)
    }

    fn should_retry(&self, expr1: &Expr, expr2: &Expr) -> bool {
        match self.retry {
            RetryPolicy::Always => true,
            RetryPolicy::WhenDeferred => expr1.has_deferred() || expr2.has_deferred(),
            RetryPolicy::Never => false,
        }
    }

    fn run_pass(
        &self,
        pass: Pass,
        subject: &Subject<'_>,
        vectors: &[TestVector],
        started: Instant,
        report: &mut Report,
    ) -> Result<PassOutcome, OracleError> {
        let mode = match pass {
            Pass::Standard => EvalMode::Standard,
            Pass::Thorough => EvalMode::Thorough,
        };
        let lhs = mode.apply(subject.lhs);
        let rhs = mode.apply(subject.rhs);
        debug!(target: "symb_equiv::oracle", %pass, vectors = vectors.len(), lhs = %lhs, rhs = %rhs, "pass started");

        for (trial, vector) in vectors.iter().enumerate() {
            report.trials += 1;

            let record = |a: Option<Complex64>,
                          b: Option<Complex64>,
                          exception: Option<String>,
                          report: &Report| ComparisonRecord {
                variables: subject.variables.to_vec(),
                vector: vector.clone(),
                expr1: subject.expr1.clone(),
                expr2: subject.expr2.clone(),
                expr1_evaluated: Expr::clone(&lhs),
                expr2_evaluated: Expr::clone(&rhs),
                expr1_final: a,
                expr2_final: b,
                pass,
                exception,
                advisories: report.advisories.clone(),
            };

            let a = match self.evaluate(&lhs, subject.variables, vector)? {
                Ok(a) => a,
                Err(err) => {
                    let failed = record(None, None, Some(err.to_string()), report);
                    return Ok(PassOutcome::Failed(failed));
                }
            };
            let b = match self.evaluate(&rhs, subject.variables, vector)? {
                Ok(b) => b,
                Err(err) => {
                    let failed = record(Some(a), None, Some(err.to_string()), report);
                    return Ok(PassOutcome::Failed(failed));
                }
            };
            trace!(target: "symb_equiv::oracle", %pass, trial, %vector, %a, %b, "trial evaluated");

            if is_exact_zero(a) || is_exact_zero(b) {
                warn!(target: "symb_equiv::oracle", %pass, trial, %vector, "exact zero, trial inconclusive");
                report.advisories.push(Advisory::InconclusiveZero { pass, trial });
            } else if !a.is_finite() || !b.is_finite() {
                warn!(target: "symb_equiv::oracle", %pass, trial, %vector, %a, %b, "non-finite result, trial inconclusive");
                report.advisories.push(Advisory::NonFinite { pass, trial });
            } else {
                let fa = flush_small_parts(a, self.significance);
                let fb = flush_small_parts(b, self.significance);
                if !compare_to_significance_complex(fa.re, fa.im, fb.re, fb.im, self.significance) {
                    debug!(target: "symb_equiv::oracle", %pass, trial, %vector, %a, %b, "discrepancy found");
                    let failed = record(Some(a), Some(b), None, report);
                    return Ok(PassOutcome::Failed(failed));
                }
            }

            if let Some(limit) = self.time_limit {
                if started.elapsed() >= limit {
                    warn!(target: "symb_equiv::oracle", %pass, trials = trial + 1, "time limit reached");
                    report.advisories.push(Advisory::BudgetExhausted {
                        pass,
                        trials: trial + 1,
                    });
                    return Ok(PassOutcome::OutOfTime);
                }
            }
        }

        debug!(target: "symb_equiv::oracle", %pass, trials = vectors.len(), "pass finished without discrepancy");
        Ok(PassOutcome::Completed)
    }

    /// Evaluate one side. The outer `Err` is an error to propagate; the inner
    /// one is converted into a record by the caller.
    fn evaluate(
        &self,
        expr: &Expr,
        variables: &[Symbol],
        vector: &TestVector,
    ) -> Result<Result<Complex64, EvalError>, OracleError> {
        match self.evaluator.evaluate(expr, variables, vector, EvalMode::Standard) {
            Ok(value) => Ok(Ok(value)),
            Err(err) if self.convert_exceptions && !err.is_fatal() => {
                warn!(target: "symb_equiv::oracle", %expr, %vector, error = %err, "evaluation failed, converted");
                Ok(Err(err))
            }
            Err(err) => Err(OracleError::Evaluation {
                source: err,
                expr: expr.to_string(),
                vector: vector.to_string(),
            }),
        }
    }
}

fn is_exact_zero(z: Complex64) -> bool {
    z.re == 0.0 && z.im == 0.0
}

/// Zero out a component far below the magnitude of the whole value
fn flush_small_parts(z: Complex64, digits: u32) -> Complex64 {
    let exponent = i32::try_from(digits).unwrap_or(i32::MAX).saturating_add(3);
    let threshold = z.norm() * 10f64.powi(-exponent);
    let flush = |x: f64| if x.abs() < threshold { 0.0 } else { x };
    Complex64::new(flush(z.re), flush(z.im))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_small_parts() {
        let z = flush_small_parts(Complex64::new(2.0, 1e-15), 10);
        assert_eq!(z, Complex64::new(2.0, 0.0));
        let kept = flush_small_parts(Complex64::new(2.0, 1e-5), 10);
        assert_eq!(kept.im, 1e-5);
    }

    #[test]
    fn test_retry_policy() {
        let oracle = EquivalenceOracle::new().retry_policy(RetryPolicy::Never);
        let x = Symbol::plain("x");
        let integral = Expr::integral(x.to_expr(), x, Expr::integer(0), Expr::integer(1));
        assert!(!oracle.should_retry(&integral, &integral));
        assert!(EquivalenceOracle::new().should_retry(&integral, &Expr::integer(1)));
        assert!(!EquivalenceOracle::new().should_retry(&Expr::integer(1), &Expr::integer(1)));
    }
}
