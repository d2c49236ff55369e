//! Stack machine for compiled programs.
//!
//! Runs a [`Program`] over complex doubles. Integrals recurse into their
//! sub-program through the adaptive quadrature, binding the integration
//! variable as one extra trailing parameter.

use num_complex::Complex64;

use super::compiler::{BoundKind, Instruction, Program};
use super::quadrature::{Bound, Quadrature};
use crate::error::EvalError;

impl Program {
    /// Evaluate the program at `params`.
    ///
    /// # Errors
    /// Domain errors from functions, quadrature failures, and
    /// [`EvalError::MalformedProgram`] if the stack discipline is broken.
    pub(crate) fn run(&self, params: &[Complex64], quad: &Quadrature) -> Result<Complex64, EvalError> {
        if params.len() != self.param_count {
            return Err(EvalError::InvalidVectorLength {
                expected: self.param_count,
                got: params.len(),
            });
        }

        let mut stack: Vec<Complex64> = Vec::with_capacity(self.max_stack);

        for instr in &self.instructions {
            match *instr {
                Instruction::LoadConst(idx) => {
                    let value = self
                        .constants
                        .get(idx as usize)
                        .ok_or(EvalError::MalformedProgram("constant index"))?;
                    stack.push(*value);
                }
                Instruction::LoadParam(idx) => {
                    let value = params
                        .get(idx as usize)
                        .ok_or(EvalError::MalformedProgram("parameter index"))?;
                    stack.push(*value);
                }
                Instruction::Add => {
                    let rhs = pop(&mut stack)?;
                    *top(&mut stack)? += rhs;
                }
                Instruction::Mul => {
                    let rhs = pop(&mut stack)?;
                    *top(&mut stack)? *= rhs;
                }
                Instruction::Powi(n) => {
                    let base = top(&mut stack)?;
                    *base = base.powi(n);
                }
                Instruction::Pow => {
                    let exp = pop(&mut stack)?;
                    let base = top(&mut stack)?;
                    *base = complex_pow(*base, exp);
                }
                Instruction::Call { def, argc } => {
                    let argc = argc as usize;
                    let at = stack
                        .len()
                        .checked_sub(argc)
                        .ok_or(EvalError::MalformedProgram("stack underflow in call"))?;
                    let value = (def.eval)(&stack[at..]).ok_or_else(|| {
                        EvalError::OutOfRange(format!("{}: argument outside domain", def.name))
                    })?;
                    stack.truncate(at);
                    stack.push(value);
                }
                Instruction::Integrate {
                    program,
                    lower,
                    upper,
                } => {
                    let sub = self
                        .subprograms
                        .get(program as usize)
                        .ok_or(EvalError::MalformedProgram("sub-program index"))?;
                    // upper bound is on top
                    let hi = bound(upper, &mut stack)?;
                    let lo = bound(lower, &mut stack)?;

                    let mut scratch = Vec::with_capacity(params.len() + 1);
                    scratch.extend_from_slice(params);
                    scratch.push(Complex64::new(0.0, 0.0));
                    let last = params.len();

                    let value = quad.integrate(
                        |x| {
                            scratch[last] = x;
                            sub.run(&scratch, quad)
                        },
                        lo,
                        hi,
                    )?;
                    stack.push(value);
                }
            }
        }

        match stack.as_slice() {
            [result] => Ok(*result),
            _ => Err(EvalError::MalformedProgram("stack not balanced at exit")),
        }
    }
}

#[inline]
fn pop(stack: &mut Vec<Complex64>) -> Result<Complex64, EvalError> {
    stack.pop().ok_or(EvalError::MalformedProgram("stack underflow"))
}

#[inline]
fn top(stack: &mut [Complex64]) -> Result<&mut Complex64, EvalError> {
    stack.last_mut().ok_or(EvalError::MalformedProgram("stack underflow"))
}

fn bound(kind: BoundKind, stack: &mut Vec<Complex64>) -> Result<Bound, EvalError> {
    Ok(match kind {
        BoundKind::Finite => Bound::Finite(pop(stack)?),
        BoundKind::PosInf => Bound::PosInf,
        BoundKind::NegInf => Bound::NegInf,
    })
}

/// Principal power `b^e`
///
/// Real integral exponents go through repeated multiplication so that
/// `(-2)^3.0` stays exactly real. A zero base follows the real limit.
pub(crate) fn complex_pow(base: Complex64, exp: Complex64) -> Complex64 {
    if exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        return base.powi(exp.re as i32);
    }
    if base.re == 0.0 && base.im == 0.0 {
        return if exp.im == 0.0 && exp.re > 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(f64::INFINITY, 0.0)
        };
    }
    base.powc(exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::compiler::Compiler;
    use crate::{Assumptions, Expr, Symbol};

    fn run(expr: &Expr, params: &[Symbol], values: &[Complex64]) -> Result<Complex64, EvalError> {
        Compiler::compile(expr, params)?.run(values, &Quadrature::default())
    }

    #[test]
    fn test_polynomial() {
        let x = Symbol::new("x", Assumptions::real());
        let expr = x.pow(2) + 2 * x.to_expr() + 1;
        let r = run(&expr, &[x], &[Complex64::new(3.0, 0.0)]).unwrap();
        assert_eq!(r, Complex64::new(16.0, 0.0));
    }

    #[test]
    fn test_complex_parts() {
        let z = Symbol::new("z", Assumptions::complex());
        let expr = z.to_expr().im() * 2;
        let r = run(&expr, &[z], &[Complex64::new(1.0, 2.0)]).unwrap();
        assert_eq!(r, Complex64::new(4.0, 0.0));
    }

    #[test]
    fn test_sqrt_of_negative_is_imaginary() {
        let r = run(&Expr::integer(-4).sqrt(), &[], &[]).unwrap();
        assert!((r - Complex64::new(0.0, 2.0)).norm() < 1e-15);
    }

    #[test]
    fn test_domain_error() {
        let err = run(&Expr::integer(0).arg(), &[], &[]).unwrap_err();
        assert!(matches!(err, EvalError::OutOfRange(_)));
    }

    #[test]
    fn test_definite_integral() {
        let x = Symbol::new("x", Assumptions::real());
        let a = Symbol::new("a", Assumptions::positive());
        // ∫_0^a x dx = a²/2
        let expr = Expr::integral(x.to_expr(), x, Expr::integer(0), a.to_expr());
        let r = run(&expr, &[a], &[Complex64::new(4.0, 0.0)]).unwrap();
        assert!((r - Complex64::new(8.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_gaussian_integral() {
        let x = Symbol::new("x", Assumptions::real());
        let body = Expr::neg_expr(x.pow(2)).exp();
        let expr = Expr::integral(body, x, Expr::neg_infinity(), Expr::infinity());
        let r = run(&expr, &[], &[]).unwrap();
        assert!((r.re - std::f64::consts::PI.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_base_power() {
        assert_eq!(
            complex_pow(Complex64::new(0.0, 0.0), Complex64::new(0.5, 0.0)),
            Complex64::new(0.0, 0.0)
        );
        assert!(complex_pow(Complex64::new(0.0, 0.0), Complex64::new(-0.5, 0.0)).re.is_infinite());
    }
}
