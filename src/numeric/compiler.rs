//! Expression compiler for the standard backend.
//!
//! Compiles an [`Expr`] into flat bytecode over a complex-double stack. Each
//! integral gets a sub-program whose parameters are the enclosing parameters
//! followed by the integration variable.
//!
//! # Stack Depth Tracking
//!
//! The compiler tracks stack depth while emitting so the evaluator can
//! pre-allocate its stack, and rejects trees deeper than [`MAX_STACK_DEPTH`].

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::f64::consts::{E, PI};

use crate::core::{Constant, Expr, ExprKind, Symbol};
use crate::error::EvalError;
use crate::functions::{FunctionDefinition, Registry};

/// Maximum allowed stack depth
pub const MAX_STACK_DEPTH: usize = 1024;

/// Kind of an integration bound; finite bounds are taken from the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundKind {
    Finite,
    PosInf,
    NegInf,
}

impl BoundKind {
    pub(crate) fn of(bound: &Expr) -> Self {
        match bound.kind() {
            ExprKind::Constant(Constant::Infinity) => Self::PosInf,
            ExprKind::Constant(Constant::NegInfinity) => Self::NegInf,
            _ => Self::Finite,
        }
    }
}

/// Bytecode instruction
#[derive(Debug, Clone, Copy)]
pub(crate) enum Instruction {
    /// Push constant pool entry
    LoadConst(u32),
    /// Push parameter value
    LoadParam(u32),
    /// Pop two, push sum
    Add,
    /// Pop two, push product
    Mul,
    /// Raise top to an integer power
    Powi(i32),
    /// Pop exponent and base, push principal power
    Pow,
    /// Pop `argc` arguments, push function value
    Call {
        def: &'static FunctionDefinition,
        argc: u32,
    },
    /// Integrate sub-program over its last parameter; finite bounds are
    /// popped (upper on top)
    Integrate {
        program: u32,
        lower: BoundKind,
        upper: BoundKind,
    },
}

/// A compiled expression, ready to run
#[derive(Debug, Clone)]
pub(crate) struct Program {
    pub(crate) instructions: Box<[Instruction]>,
    pub(crate) constants: Box<[Complex64]>,
    pub(crate) subprograms: Box<[Program]>,
    pub(crate) param_count: usize,
    pub(crate) max_stack: usize,
}

/// Internal compiler state for transforming expressions to bytecode
pub(crate) struct Compiler {
    /// Emitted bytecode instructions
    instructions: Vec<Instruction>,
    /// Parameters in evaluation order; later entries shadow earlier ones
    params: Vec<Symbol>,
    /// Current stack depth during compilation
    current_stack: usize,
    /// Maximum stack depth seen during compilation
    max_stack: usize,
    /// Constant pool
    constants: Vec<Complex64>,
    /// Map from constant bit pattern to pool index
    const_map: FxHashMap<(u64, u64), u32>,
    /// Compiled integrands
    subprograms: Vec<Program>,
}

impl Compiler {
    pub(crate) fn new(params: Vec<Symbol>) -> Self {
        Self {
            instructions: Vec::with_capacity(32),
            params,
            current_stack: 0,
            max_stack: 0,
            constants: Vec::new(),
            const_map: FxHashMap::default(),
            subprograms: Vec::new(),
        }
    }

    /// Compile `expr` as a function of `params`
    pub(crate) fn compile(expr: &Expr, params: &[Symbol]) -> Result<Program, EvalError> {
        let mut compiler = Self::new(params.to_vec());
        compiler.compile_expr(expr)?;
        Ok(compiler.finish())
    }

    fn finish(self) -> Program {
        Program {
            instructions: self.instructions.into_boxed_slice(),
            constants: self.constants.into_boxed_slice(),
            subprograms: self.subprograms.into_boxed_slice(),
            param_count: self.params.len(),
            max_stack: self.max_stack,
        }
    }

    /// Add a constant to the pool, deduplicating by bit pattern
    fn add_const(&mut self, value: Complex64) -> Result<u32, EvalError> {
        let key = (value.re.to_bits(), value.im.to_bits());
        match self.const_map.entry(key) {
            Entry::Occupied(o) => Ok(*o.get()),
            Entry::Vacant(v) => {
                let idx = u32::try_from(self.constants.len())
                    .map_err(|_| EvalError::OutOfRange("constant pool overflow".into()))?;
                self.constants.push(value);
                v.insert(idx);
                Ok(idx)
            }
        }
    }

    fn push(&mut self) -> Result<(), EvalError> {
        self.current_stack += 1;
        if self.current_stack > MAX_STACK_DEPTH {
            return Err(EvalError::OutOfRange(format!(
                "expression needs stack depth {} (limit {MAX_STACK_DEPTH})",
                self.current_stack
            )));
        }
        self.max_stack = self.max_stack.max(self.current_stack);
        Ok(())
    }

    const fn pop(&mut self, n: usize) {
        self.current_stack = self.current_stack.saturating_sub(n);
    }

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    fn load_const(&mut self, value: Complex64) -> Result<(), EvalError> {
        let idx = self.add_const(value)?;
        self.emit(Instruction::LoadConst(idx));
        self.push()
    }

    fn lookup(name: &str) -> Result<&'static FunctionDefinition, EvalError> {
        Registry::get(name).ok_or_else(|| EvalError::UnsupportedFunction(name.to_string()))
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), EvalError> {
        match expr.kind() {
            ExprKind::Number(n) => {
                let value = n
                    .to_f64()
                    .ok_or_else(|| EvalError::OutOfRange(format!("rational {n} as double")))?;
                self.load_const(Complex64::new(value, 0.0))
            }
            ExprKind::Float(x) => self.load_const(Complex64::new(*x, 0.0)),
            ExprKind::Constant(c) => self.load_const(constant_value(*c)),
            ExprKind::Symbol(s) => {
                let idx = self
                    .params
                    .iter()
                    .rposition(|p| p == s)
                    .ok_or_else(|| EvalError::IncompleteSubstitution {
                        symbol: s.name().to_string(),
                    })?;
                let idx = u32::try_from(idx)
                    .map_err(|_| EvalError::OutOfRange("parameter index".into()))?;
                self.emit(Instruction::LoadParam(idx));
                self.push()
            }
            ExprKind::Sum(terms) => self.compile_fold(terms, Instruction::Add),
            ExprKind::Product(factors) => self.compile_fold(factors, Instruction::Mul),
            ExprKind::Pow(base, exp) => {
                if let Some(n) = exp.as_integer().and_then(|n| i32::try_from(n).ok()) {
                    self.compile_expr(base)?;
                    self.emit(Instruction::Powi(n));
                    return Ok(());
                }
                if exp.as_number().is_some_and(|n| *n == BigRational::new(BigInt::from(1), BigInt::from(2))) {
                    self.compile_expr(base)?;
                    self.emit(Instruction::Call {
                        def: Self::lookup("sqrt")?,
                        argc: 1,
                    });
                    return Ok(());
                }
                self.compile_expr(base)?;
                self.compile_expr(exp)?;
                self.emit(Instruction::Pow);
                self.pop(1);
                Ok(())
            }
            ExprKind::FunctionCall { name, args } => {
                let def = Self::lookup(name)?;
                if !def.validate_arity(args.len()) {
                    return Err(EvalError::InvalidArity {
                        name: name.to_string(),
                        got: args.len(),
                    });
                }
                for arg in args {
                    self.compile_expr(arg)?;
                }
                let argc = u32::try_from(args.len())
                    .map_err(|_| EvalError::OutOfRange("argument count".into()))?;
                self.emit(Instruction::Call { def, argc });
                self.pop(args.len());
                self.push()
            }
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let lower_kind = BoundKind::of(lower);
                let upper_kind = BoundKind::of(upper);
                let mut finite = 0;
                for (bound, kind) in [(lower, lower_kind), (upper, upper_kind)] {
                    if kind == BoundKind::Finite {
                        self.compile_expr(bound)?;
                        finite += 1;
                    }
                }

                let mut inner_params = self.params.clone();
                inner_params.push(var.clone());
                let mut inner = Self::new(inner_params);
                inner.compile_expr(integrand)?;
                let program = u32::try_from(self.subprograms.len())
                    .map_err(|_| EvalError::OutOfRange("too many integrals".into()))?;
                self.subprograms.push(inner.finish());

                self.emit(Instruction::Integrate {
                    program,
                    lower: lower_kind,
                    upper: upper_kind,
                });
                self.pop(finite);
                self.push()
            }
        }
    }

    fn compile_fold(
        &mut self,
        operands: &[std::sync::Arc<Expr>],
        op: Instruction,
    ) -> Result<(), EvalError> {
        let mut iter = operands.iter();
        match iter.next() {
            Some(first) => self.compile_expr(first)?,
            // empty n-ary nodes are not produced by the constructors
            None => {
                let identity = if matches!(op, Instruction::Mul) { 1.0 } else { 0.0 };
                return self.load_const(Complex64::new(identity, 0.0));
            }
        }
        for operand in iter {
            self.compile_expr(operand)?;
            self.emit(op);
            self.pop(1);
        }
        Ok(())
    }
}

const fn constant_value(c: Constant) -> Complex64 {
    match c {
        Constant::Pi => Complex64::new(PI, 0.0),
        Constant::E => Complex64::new(E, 0.0),
        Constant::I => Complex64::new(0.0, 1.0),
        Constant::Infinity => Complex64::new(f64::INFINITY, 0.0),
        Constant::NegInfinity => Complex64::new(f64::NEG_INFINITY, 0.0),
    }
}
