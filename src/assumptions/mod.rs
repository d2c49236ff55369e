//! Assumption declarations and their resolution into constraint records.
//!
//! A variable is declared with a set of flags (`positive`, `integer`,
//! `real_part_nonnegative`, ...). Before witnesses are generated the
//! declaration is closed under the implication rules in [`rules`], and for
//! complex variables the real and imaginary parts get records of their own.

mod flag;
mod resolver;
mod rules;

use std::collections::BTreeMap;
use std::fmt;

pub use flag::Flag;
pub use resolver::{ConstraintRecord, Domain, PartConstraints, VariableConstraint, resolve};

/// Prefix for flags that constrain the real part of a complex variable
pub const REAL_PART_PREFIX: &str = "real_part_";
/// Prefix for flags that constrain the imaginary part of a complex variable
pub const IMAGINARY_PART_PREFIX: &str = "imaginary_part_";

/// Declared assumptions of a variable: flag name to truth value.
///
/// Names are validated when the declaration is resolved, not when it is
/// built, so part-prefixed flags can be stated alongside plain ones.
///
/// # Example
/// ```
/// use symb_equiv::Assumptions;
///
/// let a = Assumptions::complex().with("real_part_positive", true);
/// assert_eq!(a.get("real_part_positive"), Some(true));
/// assert_eq!(a.get("integer"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assumptions {
    declared: BTreeMap<String, bool>,
}

impl Assumptions {
    /// No assumptions: the variable ranges over the complex numbers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `flag = value`
    #[must_use]
    pub fn with(mut self, flag: impl Into<String>, value: bool) -> Self {
        self.declared.insert(flag.into(), value);
        self
    }

    /// Look up a declared flag
    #[must_use]
    pub fn get(&self, flag: &str) -> Option<bool> {
        self.declared.get(flag).copied()
    }

    /// Iterate over declared flags in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.declared.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True when nothing is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// `real = true`
    #[must_use]
    pub fn real() -> Self {
        Self::new().with("real", true)
    }

    /// `complex = true`
    #[must_use]
    pub fn complex() -> Self {
        Self::new().with("complex", true)
    }

    /// `imaginary = true`
    #[must_use]
    pub fn imaginary() -> Self {
        Self::new().with("imaginary", true)
    }

    /// `positive = true`
    #[must_use]
    pub fn positive() -> Self {
        Self::new().with("positive", true)
    }

    /// `negative = true`
    #[must_use]
    pub fn negative() -> Self {
        Self::new().with("negative", true)
    }

    /// `nonnegative = true`
    #[must_use]
    pub fn nonnegative() -> Self {
        Self::new().with("nonnegative", true)
    }

    /// `integer = true`
    #[must_use]
    pub fn integer() -> Self {
        Self::new().with("integer", true)
    }

    /// `rational = true`
    #[must_use]
    pub fn rational() -> Self {
        Self::new().with("rational", true)
    }
}

impl fmt::Display for Assumptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assumptions {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            declared: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
