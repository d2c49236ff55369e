//! Test vector assembly.
//!
//! Witness lists of all variables are aligned cyclically: the number of
//! vectors equals the longest list and shorter lists wrap around. A
//! Cartesian product would grow exponentially with the number of variables.

use std::fmt;
use std::ops::Deref;

use crate::assumptions::{VariableConstraint, resolve};
use crate::error::AssumptionError;
use crate::witness::{WitnessList, build_witnesses, scale_for};
use crate::{Expr, Symbol};

/// One complete assignment of witnesses, positionally matching the variable list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestVector(Vec<Expr>);

impl TestVector {
    /// Wrap explicit values
    #[must_use]
    pub const fn new(values: Vec<Expr>) -> Self {
        Self(values)
    }

    /// Consume into the underlying values
    #[must_use]
    pub fn into_vec(self) -> Vec<Expr> {
        self.0
    }
}

impl Deref for TestVector {
    type Target = [Expr];
    fn deref(&self) -> &[Expr] {
        &self.0
    }
}

impl fmt::Display for TestVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Align witness lists cyclically into test vectors.
///
/// With no lists the result is a single empty vector, so closed expressions
/// are still compared once.
#[must_use]
pub fn align(lists: &[WitnessList]) -> Vec<TestVector> {
    if lists.is_empty() {
        return vec![TestVector::new(Vec::new())];
    }
    // a variable without witnesses admits no complete assignment
    if lists.iter().any(|l| l.is_empty()) {
        return Vec::new();
    }
    let n = lists.iter().map(|l| l.len()).max().unwrap_or(0);
    (0..n)
        .map(|i| TestVector::new(lists.iter().map(|l| l[i % l.len()].clone()).collect()))
        .collect()
}

/// Build the test vectors for `variables`, in order.
///
/// # Errors
/// Propagates assumption resolution failures.
pub fn build_test_vectors(variables: &[Symbol]) -> Result<Vec<TestVector>, AssumptionError> {
    let constraints = variables
        .iter()
        .map(|var| resolve(var.assumptions()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(vectors_for_constraints(&constraints))
}

/// Test vectors for already resolved constraints.
///
/// Variable `k` draws its witnesses at scale `1 + 2k`.
#[must_use]
pub fn vectors_for_constraints(constraints: &[VariableConstraint]) -> Vec<TestVector> {
    let lists: Vec<WitnessList> = constraints
        .iter()
        .enumerate()
        .map(|(k, c)| build_witnesses(c, &scale_for(k)))
        .collect();
    align(&lists)
}
