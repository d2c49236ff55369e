//! Core expression types
//!
//! This module contains the fundamental types:
//! - `Expr` / `ExprKind` / `Constant` - Expression tree
//! - `Symbol` - Variables with attached assumptions
//! - Display formatting and operator overloading

mod display;
pub(crate) mod expr;
mod operators;
pub(crate) mod symbol;

pub use expr::{Constant, Expr, ExprKind, Operator, compute_expr_hash};
pub use symbol::{Symbol, symbols};
