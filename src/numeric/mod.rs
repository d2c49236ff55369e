//! Numeric evaluation of expressions at test vectors.
//!
//! The evaluator decomposes each witness into a complex double and hands the
//! expression, the variable list and the point to a [`NumericBackend`]:
//!
//! - [`StandardBackend`] compiles to bytecode and runs it over `Complex64`
//! - [`ArbitraryPrecisionBackend`] walks the tree over exact Gaussian
//!   rationals, falling back to doubles only where it must
//!
//! # Example
//! ```
//! use symb_equiv::{Assumptions, EvalMode, NumericEvaluator, Symbol, TestVector, Expr};
//!
//! let x = Symbol::new("x", Assumptions::real());
//! let expr = x.pow(2) + 1;
//! let vector = TestVector::new(vec![Expr::integer(3)]);
//! let value = NumericEvaluator::default()
//!     .evaluate(&expr, &[x], &vector, EvalMode::Standard)
//!     .unwrap();
//! assert_eq!(value.re, 10.0);
//! ```

mod compiler;
mod execution;
mod precise;
mod quadrature;

use std::borrow::Cow;
use std::fmt;

use num_complex::Complex64;
use tracing::trace;

pub use compiler::MAX_STACK_DEPTH;
pub use precise::ArbitraryPrecisionBackend;
pub use quadrature::DEFAULT_MAX_INTERVALS;

use crate::core::{Expr, Symbol};
use crate::error::EvalError;
use crate::vectors::TestVector;
use compiler::Compiler;
use quadrature::Quadrature;

/// A numeric evaluation strategy.
///
/// `point[k]` is the value of `params[k]`. Any other free symbol that is not
/// bound by an enclosing integral must yield
/// [`EvalError::IncompleteSubstitution`].
pub trait NumericBackend: fmt::Debug + Send + Sync {
    /// Evaluate `expr` with `params` bound to `point`
    ///
    /// # Errors
    /// Any evaluation failure of the backend.
    fn evaluate(
        &self,
        expr: &Expr,
        params: &[Symbol],
        point: &[Complex64],
    ) -> Result<Complex64, EvalError>;
}

/// Double-precision backend: bytecode over complex doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandardBackend {
    quad: Quadrature,
}

impl StandardBackend {
    /// Create a backend with the default quadrature settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of quadrature subintervals per integral
    #[must_use]
    pub const fn max_intervals(mut self, n: usize) -> Self {
        self.quad.max_intervals = n;
        self
    }
}

impl NumericBackend for StandardBackend {
    fn evaluate(
        &self,
        expr: &Expr,
        params: &[Symbol],
        point: &[Complex64],
    ) -> Result<Complex64, EvalError> {
        let program = Compiler::compile(expr, params)?;
        program.run(point, &self.quad)
    }
}

/// How much work to do before evaluating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalMode {
    /// Evaluate the expression as given
    #[default]
    Standard,
    /// Force deferred operations (`doit`) first
    Thorough,
}

impl EvalMode {
    /// The form of `expr` this mode evaluates
    #[must_use]
    pub fn apply(self, expr: &Expr) -> Cow<'_, Expr> {
        match self {
            Self::Standard => Cow::Borrowed(expr),
            Self::Thorough => Cow::Owned(expr.doit()),
        }
    }
}

impl Expr {
    /// Numeric `(re, im)` of a closed expression
    ///
    /// # Errors
    /// [`EvalError::IncompleteSubstitution`] if the expression has a free
    /// symbol, or any evaluation failure.
    pub fn as_real_imag(&self) -> Result<(f64, f64), EvalError> {
        let z = StandardBackend::default().evaluate(self, &[], &[])?;
        Ok((z.re, z.im))
    }
}

/// Evaluates expressions at test vectors through a backend
#[derive(Debug)]
pub struct NumericEvaluator {
    backend: Box<dyn NumericBackend>,
}

impl Default for NumericEvaluator {
    fn default() -> Self {
        Self::new(StandardBackend::default())
    }
}

impl NumericEvaluator {
    /// Evaluator over `backend`
    #[must_use]
    pub fn new(backend: impl NumericBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Evaluate `expr` with `variables[k]` set to `vector[k]`.
    ///
    /// # Errors
    /// - [`EvalError::InvalidVectorLength`] if the vector and variable list
    ///   differ in length
    /// - [`EvalError::IncompleteSubstitution`] if `expr` has a free symbol
    ///   outside `variables`
    /// - any backend failure
    pub fn evaluate(
        &self,
        expr: &Expr,
        variables: &[Symbol],
        vector: &TestVector,
        mode: EvalMode,
    ) -> Result<Complex64, EvalError> {
        if vector.len() != variables.len() {
            return Err(EvalError::InvalidVectorLength {
                expected: variables.len(),
                got: vector.len(),
            });
        }
        let expr = mode.apply(expr);
        let point = vector
            .iter()
            .map(|w| w.as_real_imag().map(|(re, im)| Complex64::new(re, im)))
            .collect::<Result<Vec<_>, _>>()?;
        let value = self.backend.evaluate(&expr, variables, &point)?;
        trace!(target: "symb_equiv::numeric", %vector, %value, ?mode, "evaluated");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;

    #[test]
    fn test_vector_length_mismatch() {
        let x = Symbol::new("x", Assumptions::real());
        let err = NumericEvaluator::default()
            .evaluate(&x.to_expr(), &[x], &TestVector::new(vec![]), EvalMode::Standard)
            .unwrap_err();
        assert_eq!(err, EvalError::InvalidVectorLength { expected: 1, got: 0 });
    }

    #[test]
    fn test_incomplete_substitution() {
        let x = Symbol::new("x", Assumptions::real());
        let dv = Symbol::new("dv", Assumptions::real());
        let expr = x.to_expr() * dv.to_expr();
        let err = NumericEvaluator::default()
            .evaluate(&expr, &[x], &TestVector::new(vec![Expr::integer(2)]), EvalMode::Standard)
            .unwrap_err();
        assert!(err.to_string().contains("Result is still an expression"));
    }

    #[test]
    fn test_complex_witness() {
        let z = Symbol::new("z", Assumptions::complex());
        let witness = Expr::integer(2) + Expr::integer(4) * Expr::i();
        let value = NumericEvaluator::default()
            .evaluate(&(z.to_expr() * 2), &[z], &TestVector::new(vec![witness]), EvalMode::Standard)
            .unwrap();
        assert_eq!(value, Complex64::new(4.0, 8.0));
    }

    #[test]
    fn test_thorough_mode_forces_integrals() {
        let x = Symbol::new("x", Assumptions::real());
        let expr = Expr::integral(x.pow(2), x, Expr::integer(0), Expr::integer(3));
        assert_eq!(EvalMode::Thorough.apply(&expr).as_ref(), &Expr::integer(9));
        assert!(matches!(EvalMode::Standard.apply(&expr), Cow::Borrowed(_)));
    }

    #[test]
    fn test_as_real_imag() {
        let (re, im) = (Expr::integer(3) - Expr::i()).as_real_imag().unwrap();
        assert_eq!((re, im), (3.0, -1.0));
    }
}
