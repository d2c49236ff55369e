//! Error types for assumption resolution, numeric evaluation and the oracle.

use thiserror::Error;

/// Errors raised while resolving a variable's declared assumptions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssumptionError {
    /// A declared flag name is not part of the vocabulary
    #[error("unknown assumption flag '{0}'")]
    UnknownFlag(String),

    /// Forward chaining required a flag to be both true and false
    #[error("inconsistent assumptions: '{flag}' is implied to be both true and false")]
    Inconsistent {
        /// The flag that received both values
        flag: &'static str,
    },
}

/// Errors raised while evaluating an expression at a test vector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The evaluation result still contains a free symbol
    #[error(
        "Result is still an expression (free symbol '{symbol}'). Check to be sure all free variables are passed in the compare call."
    )]
    IncompleteSubstitution {
        /// Name of the symbol that was left unbound
        symbol: String,
    },

    /// Programming error: vector length does not match the variable list
    #[error("invalid test vector length: expected {expected} values, got {got}")]
    InvalidVectorLength {
        /// Number of variables
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Function name is not in the numeric registry
    #[error("unsupported function '{0}' in numeric evaluation")]
    UnsupportedFunction(String),

    /// Function called with the wrong number of arguments
    #[error("function '{name}' called with {got} argument(s)")]
    InvalidArity {
        /// Function name
        name: String,
        /// Number of arguments supplied
        got: usize,
    },

    /// A value could not be represented in the backend's number type
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Numeric integration failed to produce a finite estimate
    #[error("numeric integration failed: {0}")]
    Quadrature(String),

    /// Internal evaluator invariant was broken (stack underflow, bad index)
    #[error("malformed evaluation program: {0}")]
    MalformedProgram(&'static str),
}

impl EvalError {
    /// Errors that must always propagate, regardless of the oracle's
    /// exception-conversion setting
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidVectorLength { .. } | Self::MalformedProgram(_))
    }
}

/// Errors surfaced by the equivalence oracle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// A variable's assumptions could not be resolved
    #[error(transparent)]
    Assumptions(#[from] AssumptionError),

    /// Evaluation failed and exception conversion is disabled (or the
    /// failure is fatal)
    #[error("evaluation of `{expr}` at {vector} failed: {source}")]
    Evaluation {
        /// Underlying evaluation error
        source: EvalError,
        /// The expression being evaluated
        expr: String,
        /// The test vector, formatted
        vector: String,
    },
}

impl OracleError {
    /// The underlying evaluation error, if this is one
    #[must_use]
    pub const fn eval_error(&self) -> Option<&EvalError> {
        match self {
            Self::Evaluation { source, .. } => Some(source),
            Self::Assumptions(_) => None,
        }
    }
}
