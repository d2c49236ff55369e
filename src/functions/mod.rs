//! Function registry for numeric evaluation
//!
//! Every function name that may appear in a `FunctionCall` node and be
//! evaluated numerically is defined here once, with its arity and its
//! complex-double implementation.

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use registry::{FunctionDefinition, Registry};

/// Names of all functions the numeric backends can evaluate
#[must_use]
pub fn supported_functions() -> Vec<&'static str> {
    let mut names: Vec<_> = definitions::all_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    names.push("log");
    names.sort_unstable();
    names
}
