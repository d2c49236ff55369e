//! Function definitions for the function registry
//!
//! All functions use the principal branch, matching the conventions of
//! common algebra systems (`sqrt(-1) = i`, `ln(-1) = iπ`).

use num_complex::Complex64;

use super::registry::FunctionDefinition;

const fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Some(args[0].tan()),
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| Some(args[0].tan().inv()),
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| Some(args[0].cos().inv()),
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| Some(args[0].sin().inv()),
        },
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| Some(args[0].asin()),
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| Some(args[0].acos()),
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
        },
        FunctionDefinition {
            name: "asinh",
            arity: 1..=1,
            eval: |args| Some(args[0].asinh()),
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1..=1,
            eval: |args| Some(args[0].acosh()),
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1..=1,
            eval: |args| Some(args[0].atanh()),
        },
        // Exponential and logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Some(args[0].exp()),
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |args| Some(args[0].ln()),
        },
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| Some(args[0].sqrt()),
        },
        // Complex parts
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(real(args[0].norm())),
        },
        FunctionDefinition {
            name: "re",
            arity: 1..=1,
            eval: |args| Some(real(args[0].re)),
        },
        FunctionDefinition {
            name: "im",
            arity: 1..=1,
            eval: |args| Some(real(args[0].im)),
        },
        FunctionDefinition {
            name: "conjugate",
            arity: 1..=1,
            eval: |args| Some(args[0].conj()),
        },
        FunctionDefinition {
            name: "arg",
            arity: 1..=1,
            eval: |args| {
                // arg(0) is undefined
                if args[0].re == 0.0 && args[0].im == 0.0 {
                    None
                } else {
                    Some(real(args[0].arg()))
                }
            },
        },
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            eval: |args| {
                let r = args[0].norm();
                Some(if r == 0.0 { real(0.0) } else { args[0] / r })
            },
        },
    ]
}
