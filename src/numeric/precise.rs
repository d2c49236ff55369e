//! Arbitrary-precision evaluation backend.
//!
//! Walks the tree directly, carrying exact Gaussian rationals (`p + q·i`
//! with `p, q` rational) for as long as the operations stay algebraic over
//! ℚ(i): sums, products, integer powers and the part functions. Anything
//! else (π, `e`, transcendental functions, irrational powers, integrals)
//! drops to complex doubles from that point on.
//!
//! This removes catastrophic cancellation from expressions such as
//! `re(x + 10^16) - 10^16`, which the double-precision backend loses.

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::NumericBackend;
use super::compiler::BoundKind;
use super::execution::complex_pow;
use super::quadrature::{Bound, DEFAULT_MAX_INTERVALS, Quadrature};
use crate::core::{Constant, Expr, ExprKind, Symbol};
use crate::error::EvalError;
use crate::functions::Registry;

/// Largest integer exponent expanded exactly
const MAX_EXACT_POWER: u64 = 64;

/// `re + im·i` with exact rational parts
#[derive(Debug, Clone, PartialEq, Eq)]
struct GaussianRational {
    re: BigRational,
    im: BigRational,
}

impl GaussianRational {
    fn real(re: BigRational) -> Self {
        Self {
            re,
            im: BigRational::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        Self {
            re: &self.re + &other.re,
            im: &self.im + &other.im,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        Self {
            re: &self.re * &other.re - &self.im * &other.im,
            im: &self.re * &other.im + &self.im * &other.re,
        }
    }

    /// Multiplicative inverse; `None` for zero
    fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let norm = &self.re * &self.re + &self.im * &self.im;
        Some(Self {
            re: &self.re / &norm,
            im: -(&self.im / &norm),
        })
    }

    fn powi(&self, n: i64) -> Option<Self> {
        let mut base = if n < 0 { self.recip()? } else { self.clone() };
        let mut k = n.unsigned_abs();
        let mut acc = Self::real(BigRational::one());
        while k > 0 {
            if k & 1 == 1 {
                acc = acc.mul(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.mul(&base);
            }
        }
        Some(acc)
    }

    fn to_complex(&self) -> Complex64 {
        Complex64::new(
            self.re.to_f64().unwrap_or(f64::NAN),
            self.im.to_f64().unwrap_or(f64::NAN),
        )
    }
}

/// A value during evaluation: exact while possible, double afterwards
#[derive(Debug, Clone)]
enum Value {
    Exact(GaussianRational),
    Approx(Complex64),
}

impl Value {
    fn from_complex(z: Complex64) -> Self {
        match (BigRational::from_float(z.re), BigRational::from_float(z.im)) {
            (Some(re), Some(im)) => Self::Exact(GaussianRational { re, im }),
            _ => Self::Approx(z),
        }
    }

    fn to_complex(&self) -> Complex64 {
        match self {
            Self::Exact(g) => g.to_complex(),
            Self::Approx(z) => *z,
        }
    }

    fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a.add(b)),
            _ => Self::Approx(self.to_complex() + other.to_complex()),
        }
    }

    fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a.mul(b)),
            _ => Self::Approx(self.to_complex() * other.to_complex()),
        }
    }
}

/// Evaluates with exact Gaussian-rational arithmetic where possible.
///
/// Slower than [`StandardBackend`](super::StandardBackend); meant for
/// comparisons whose expressions mix huge and tiny magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitraryPrecisionBackend {
    quad: Quadrature,
}

impl ArbitraryPrecisionBackend {
    /// Create a backend with the default quadrature settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of quadrature subintervals per integral
    #[must_use]
    pub const fn max_intervals(mut self, n: usize) -> Self {
        self.quad.max_intervals = n;
        self
    }
}

impl Default for ArbitraryPrecisionBackend {
    fn default() -> Self {
        Self {
            quad: Quadrature {
                max_intervals: DEFAULT_MAX_INTERVALS,
            },
        }
    }
}

impl NumericBackend for ArbitraryPrecisionBackend {
    fn evaluate(
        &self,
        expr: &Expr,
        params: &[Symbol],
        point: &[Complex64],
    ) -> Result<Complex64, EvalError> {
        if params.len() != point.len() {
            return Err(EvalError::InvalidVectorLength {
                expected: params.len(),
                got: point.len(),
            });
        }
        let mut env: Vec<(Symbol, Value)> = params
            .iter()
            .cloned()
            .zip(point.iter().map(|z| Value::from_complex(*z)))
            .collect();
        Ok(self.eval(expr, &mut env)?.to_complex())
    }
}

impl ArbitraryPrecisionBackend {
    fn eval(&self, expr: &Expr, env: &mut Vec<(Symbol, Value)>) -> Result<Value, EvalError> {
        match expr.kind() {
            ExprKind::Number(n) => Ok(Value::Exact(GaussianRational::real(n.clone()))),
            ExprKind::Float(x) => Ok(BigRational::from_float(*x)
                .map_or(Value::Approx(Complex64::new(*x, 0.0)), |r| {
                    Value::Exact(GaussianRational::real(r))
                })),
            ExprKind::Constant(Constant::I) => Ok(Value::Exact(GaussianRational {
                re: BigRational::zero(),
                im: BigRational::one(),
            })),
            ExprKind::Constant(c) => Ok(Value::Approx(approx_constant(*c))),
            ExprKind::Symbol(s) => env
                .iter()
                .rev()
                .find(|(bound, _)| bound == s)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| EvalError::IncompleteSubstitution {
                    symbol: s.name().to_string(),
                }),
            ExprKind::Sum(terms) => {
                let mut acc = Value::Exact(GaussianRational::real(BigRational::zero()));
                for t in terms {
                    acc = acc.add(&self.eval(t, env)?);
                }
                Ok(acc)
            }
            ExprKind::Product(factors) => {
                let mut acc = Value::Exact(GaussianRational::real(BigRational::one()));
                for f in factors {
                    acc = acc.mul(&self.eval(f, env)?);
                }
                Ok(acc)
            }
            ExprKind::Pow(base, exp) => {
                let b = self.eval(base, env)?;
                if let (Value::Exact(g), Some(n)) = (&b, exp.as_integer()) {
                    if n.unsigned_abs() <= MAX_EXACT_POWER {
                        return Ok(g
                            .powi(n)
                            .map_or(Value::Approx(Complex64::new(f64::INFINITY, 0.0)), Value::Exact));
                    }
                }
                let e = self.eval(exp, env)?;
                Ok(Value::Approx(complex_pow(b.to_complex(), e.to_complex())))
            }
            ExprKind::FunctionCall { name, args } => {
                let values = args
                    .iter()
                    .map(|a| self.eval(a, env))
                    .collect::<Result<Vec<_>, _>>()?;
                call(name, &values)
            }
            ExprKind::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let lo = self.bound(lower, env)?;
                let hi = self.bound(upper, env)?;
                let value = self.quad.integrate(
                    |x| {
                        env.push((var.clone(), Value::Approx(x)));
                        let r = self.eval(integrand, env).map(|v| v.to_complex());
                        env.pop();
                        r
                    },
                    lo,
                    hi,
                )?;
                Ok(Value::Approx(value))
            }
        }
    }

    fn bound(&self, bound: &Expr, env: &mut Vec<(Symbol, Value)>) -> Result<Bound, EvalError> {
        Ok(match BoundKind::of(bound) {
            BoundKind::PosInf => Bound::PosInf,
            BoundKind::NegInf => Bound::NegInf,
            BoundKind::Finite => Bound::Finite(self.eval(bound, env)?.to_complex()),
        })
    }
}

/// Apply a named function, exactly for the part functions
fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let def = Registry::get(name).ok_or_else(|| EvalError::UnsupportedFunction(name.to_string()))?;
    if !def.validate_arity(args.len()) {
        return Err(EvalError::InvalidArity {
            name: name.to_string(),
            got: args.len(),
        });
    }

    if let [Value::Exact(g)] = args {
        match def.name {
            "re" => return Ok(Value::Exact(GaussianRational::real(g.re.clone()))),
            "im" => return Ok(Value::Exact(GaussianRational::real(g.im.clone()))),
            "conjugate" => {
                return Ok(Value::Exact(GaussianRational {
                    re: g.re.clone(),
                    im: -g.im.clone(),
                }));
            }
            "abs" if g.im.is_zero() => return Ok(Value::Exact(GaussianRational::real(g.re.abs()))),
            _ => {}
        }
    }

    let complex: Vec<Complex64> = args.iter().map(Value::to_complex).collect();
    (def.eval)(&complex)
        .map(Value::Approx)
        .ok_or_else(|| EvalError::OutOfRange(format!("{}: argument outside domain", def.name)))
}

const fn approx_constant(c: Constant) -> Complex64 {
    match c {
        Constant::Pi => Complex64::new(std::f64::consts::PI, 0.0),
        Constant::E => Complex64::new(std::f64::consts::E, 0.0),
        Constant::I => Complex64::new(0.0, 1.0),
        Constant::Infinity => Complex64::new(f64::INFINITY, 0.0),
        Constant::NegInfinity => Complex64::new(f64::NEG_INFINITY, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assumptions;
    use num_bigint::BigInt;

    fn exact_value(expr: &Expr) -> Option<(BigRational, BigRational)> {
        match ArbitraryPrecisionBackend::default().eval(expr, &mut Vec::new()).ok()? {
            Value::Exact(g) => Some((g.re, g.im)),
            Value::Approx(_) => None,
        }
    }

    #[test]
    fn test_cancellation_is_exact() {
        let x = Symbol::new("x", Assumptions::real());
        let huge = Expr::integer(10_i64.pow(16));
        let expr = (x.to_expr() + huge.clone()).re() - huge;
        let backend = ArbitraryPrecisionBackend::new();
        let r = backend
            .evaluate(&expr, &[x], &[Complex64::new(5.0, 0.0)])
            .unwrap();
        assert_eq!(r, Complex64::new(5.0, 0.0));
    }

    #[test]
    fn test_gaussian_rational_inverse() {
        // 1 / (1 + i) = (1 - i) / 2
        let z = Expr::integer(1) + Expr::i();
        let (re, im) = exact_value(&Expr::pow(z, Expr::integer(-1))).unwrap();
        assert_eq!(re, BigRational::new(BigInt::from(1), BigInt::from(2)));
        assert_eq!(im, BigRational::new(BigInt::from(-1), BigInt::from(2)));
    }

    #[test]
    fn test_transcendental_falls_back_to_double() {
        assert!(exact_value(&Expr::pi()).is_none());
        let r = ArbitraryPrecisionBackend::new()
            .evaluate(&Expr::pi().cos(), &[], &[])
            .unwrap();
        assert!((r.re + 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_to_negative_power_is_infinite() {
        let r = ArbitraryPrecisionBackend::new()
            .evaluate(&Expr::pow(Expr::integer(0), Expr::integer(-2)), &[], &[])
            .unwrap();
        assert!(r.re.is_infinite());
    }

    #[test]
    fn test_integral_binds_variable() {
        let t = Symbol::new("t", Assumptions::real());
        let expr = Expr::integral(t.pow(2), t, Expr::integer(0), Expr::integer(3));
        let r = ArbitraryPrecisionBackend::new().evaluate(&expr, &[], &[]).unwrap();
        assert!((r.re - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_symbol() {
        let y = Symbol::new("y", Assumptions::real());
        let err = ArbitraryPrecisionBackend::new()
            .evaluate(&y.to_expr(), &[], &[])
            .unwrap_err();
        assert!(matches!(err, EvalError::IncompleteSubstitution { .. }));
    }

    #[test]
    fn test_extreme_exponent_falls_back_to_double() {
        let tiny = Expr::pow(Expr::integer(2), Expr::integer(i64::MIN));
        assert!(exact_value(&tiny).is_none());
        let r = ArbitraryPrecisionBackend::new().evaluate(&tiny, &[], &[]).unwrap();
        assert!(r.is_finite() && r.norm() < 1e-300);
    }
}
