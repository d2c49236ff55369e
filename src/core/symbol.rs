//! Symbols with attached assumption declarations.
//!
//! A symbol is identified by its name *and* its declared assumptions: `x`
//! declared real and `x` declared complex are different variables, exactly as
//! two distinct symbols would be in an algebra system.
//!
//! # Example
//! ```
//! use symb_equiv::{Assumptions, Symbol, symbols};
//!
//! let x = Symbol::new("x", Assumptions::positive());
//! let uv = symbols("u v", &Assumptions::complex());
//! assert_ne!(uv[0], uv[1]);
//! assert!(x.assumptions().get("positive").unwrap_or(false));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::Expr;
use crate::assumptions::Assumptions;

/// A named variable carrying its declared assumptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Arc<str>,
    assumptions: Arc<Assumptions>,
}

impl Symbol {
    /// Create a symbol with the given assumptions
    #[must_use]
    pub fn new(name: impl AsRef<str>, assumptions: Assumptions) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            assumptions: Arc::new(assumptions),
        }
    }

    /// Create a symbol with no declared assumptions (an unconstrained complex value)
    #[must_use]
    pub fn plain(name: impl AsRef<str>) -> Self {
        Self::new(name, Assumptions::new())
    }

    /// The symbol's name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared assumptions
    #[inline]
    #[must_use]
    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Wrap as an expression
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        Expr::symbol(self.clone())
    }

    /// Raise to a power
    #[must_use]
    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        Expr::pow(self.to_expr(), exponent.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Create several symbols sharing one set of assumptions from a
/// whitespace- or comma-separated list of names.
#[must_use]
pub fn symbols(names: &str, assumptions: &Assumptions) -> Vec<Symbol> {
    names
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|n| !n.is_empty())
        .map(|n| Symbol::new(n, assumptions.clone()))
        .collect()
}
