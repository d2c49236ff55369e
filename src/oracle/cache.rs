//! Content-keyed memo of comparison reports.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use super::record::Report;
use crate::core::{Expr, Symbol};

#[derive(Debug, Clone)]
struct Entry {
    expr1: Expr,
    expr2: Expr,
    variables: Vec<Symbol>,
    report: Report,
}

impl Entry {
    fn matches(&self, expr1: &Expr, expr2: &Expr, variables: &[Symbol]) -> bool {
        self.expr1 == *expr1 && self.expr2 == *expr2 && self.variables == variables
    }
}

/// Fingerprint of a comparison, computed from borrowed parts
fn fingerprint(expr1: &Expr, expr2: &Expr, variables: &[Symbol]) -> u64 {
    let mut hasher = FxHasher::default();
    expr1.hash(&mut hasher);
    expr2.hash(&mut hasher);
    variables.hash(&mut hasher);
    hasher.finish()
}

/// Reports keyed by `(expr1, expr2, variables)`.
///
/// Keys compare by content: expressions through their structural hash and
/// equality, symbols by name and declared assumptions. Entries are never
/// invalidated.
#[derive(Debug, Clone, Default)]
pub struct OracleCache {
    buckets: FxHashMap<u64, Vec<Entry>>,
    len: usize,
}

impl OracleCache {
    /// Empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached report for the comparison, if any
    #[must_use]
    pub fn get(&self, expr1: &Expr, expr2: &Expr, variables: &[Symbol]) -> Option<&Report> {
        self.buckets
            .get(&fingerprint(expr1, expr2, variables))?
            .iter()
            .find(|e| e.matches(expr1, expr2, variables))
            .map(|e| &e.report)
    }

    /// Store the report for the comparison, replacing an earlier one
    pub fn insert(&mut self, expr1: Expr, expr2: Expr, variables: Vec<Symbol>, report: Report) {
        let bucket = self
            .buckets
            .entry(fingerprint(&expr1, &expr2, &variables))
            .or_default();
        if let Some(existing) = bucket
            .iter_mut()
            .find(|e| e.matches(&expr1, &expr2, &variables))
        {
            existing.report = report;
            return;
        }
        bucket.push(Entry {
            expr1,
            expr2,
            variables,
            report,
        });
        self.len += 1;
    }

    /// Number of cached comparisons
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is cached
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }
}
