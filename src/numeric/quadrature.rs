//! Adaptive Gauss–Kronrod quadrature over complex-valued integrands.
//!
//! Finite bounds (possibly complex) are integrated along the straight path
//! `a + (b - a)t`, `t ∈ [0, 1]`. Infinite bounds are mapped onto finite
//! parameter intervals by rational substitutions:
//!
//! | range        | substitution        | parameter |
//! |--------------|---------------------|-----------|
//! | `(-∞, ∞)`    | `x = t / (1 - t²)`  | `(-1, 1)` |
//! | `[a, ∞)`     | `x = a + t / (1 - t)` | `[0, 1)` |
//! | `(-∞, b]`    | `x = b - (1 - t) / t` | `(0, 1]` |
//!
//! The Kronrod nodes are interior, so the singular endpoints of these maps
//! are never sampled.

use num_complex::Complex64;
use tracing::warn;

use crate::error::EvalError;

/// Default cap on the number of subintervals before giving up refinement
pub const DEFAULT_MAX_INTERVALS: usize = 200;

/// Requested relative accuracy
const EPS_REL: f64 = 1e-12;

// 15-point Kronrod abscissae (positive half) and weights, QUADPACK qk15
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

// 7-point Gauss weights at XGK[1], XGK[3], XGK[5], XGK[7]
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// An integration bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    Finite(Complex64),
    PosInf,
    NegInf,
}

/// Quadrature settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quadrature {
    pub max_intervals: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            max_intervals: DEFAULT_MAX_INTERVALS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    lo: f64,
    hi: f64,
    estimate: Complex64,
    error: f64,
}

impl Quadrature {
    /// Integrate `f` from `lower` to `upper`
    pub(crate) fn integrate<F>(&self, mut f: F, lower: Bound, upper: Bound) -> Result<Complex64, EvalError>
    where
        F: FnMut(Complex64) -> Result<Complex64, EvalError>,
    {
        use Bound::{Finite, NegInf, PosInf};

        match (lower, upper) {
            (Finite(a), Finite(b)) => {
                if a == b {
                    return Ok(Complex64::new(0.0, 0.0));
                }
                let span = b - a;
                self.adaptive(&mut |t| Ok(f(a + span * t)? * span), 0.0, 1.0)
            }
            (NegInf, PosInf) => self.whole_line(&mut f),
            (PosInf, NegInf) => Ok(-self.whole_line(&mut f)?),
            (Finite(a), PosInf) => self.upper_tail(&mut f, a),
            (PosInf, Finite(a)) => Ok(-self.upper_tail(&mut f, a)?),
            (NegInf, Finite(b)) => self.lower_tail(&mut f, b),
            (Finite(b), NegInf) => Ok(-self.lower_tail(&mut f, b)?),
            (PosInf, PosInf) | (NegInf, NegInf) => Ok(Complex64::new(0.0, 0.0)),
        }
    }

    fn whole_line<F>(&self, f: &mut F) -> Result<Complex64, EvalError>
    where
        F: FnMut(Complex64) -> Result<Complex64, EvalError>,
    {
        self.adaptive(
            &mut |t| {
                let d = 1.0 - t * t;
                let x = t / d;
                let jacobian = (1.0 + t * t) / (d * d);
                Ok(f(Complex64::new(x, 0.0))? * jacobian)
            },
            -1.0,
            1.0,
        )
    }

    fn upper_tail<F>(&self, f: &mut F, a: Complex64) -> Result<Complex64, EvalError>
    where
        F: FnMut(Complex64) -> Result<Complex64, EvalError>,
    {
        self.adaptive(
            &mut |t| {
                let d = 1.0 - t;
                Ok(f(a + t / d)? * (1.0 / (d * d)))
            },
            0.0,
            1.0,
        )
    }

    fn lower_tail<F>(&self, f: &mut F, b: Complex64) -> Result<Complex64, EvalError>
    where
        F: FnMut(Complex64) -> Result<Complex64, EvalError>,
    {
        self.adaptive(
            &mut |t| Ok(f(b - (1.0 - t) / t)? * (1.0 / (t * t))),
            0.0,
            1.0,
        )
    }

    /// Globally adaptive bisection: always split the segment with the
    /// largest error estimate.
    fn adaptive<G>(&self, g: &mut G, lo: f64, hi: f64) -> Result<Complex64, EvalError>
    where
        G: FnMut(f64) -> Result<Complex64, EvalError>,
    {
        let mut segments = vec![kronrod(g, lo, hi)?];

        loop {
            let total = segments
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, s| acc + s.estimate);
            let error: f64 = segments.iter().map(|s| s.error).sum();

            if !total.is_finite() || !error.is_finite() {
                return Err(EvalError::Quadrature(format!(
                    "non-finite estimate {total} over [{lo}, {hi}]"
                )));
            }
            if error <= EPS_REL * total.norm() || error <= f64::MIN_POSITIVE {
                return Ok(total);
            }
            if segments.len() >= self.max_intervals {
                warn!(
                    target: "symb_equiv::quadrature",
                    intervals = segments.len(),
                    error,
                    "interval limit reached before requested accuracy"
                );
                return Ok(total);
            }

            let worst = segments
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.error.total_cmp(&b.error))
                .map_or(0, |(i, _)| i);
            let seg = segments.swap_remove(worst);
            let mid = 0.5 * (seg.lo + seg.hi);
            if mid <= seg.lo || mid >= seg.hi {
                // cannot split any further in double precision
                segments.push(seg);
                warn!(target: "symb_equiv::quadrature", error, "subinterval too narrow to bisect");
                return Ok(total);
            }
            segments.push(kronrod(g, seg.lo, mid)?);
            segments.push(kronrod(g, mid, seg.hi)?);
        }
    }
}

/// 15-point Kronrod estimate with the embedded 7-point Gauss rule for error
fn kronrod<G>(g: &mut G, lo: f64, hi: f64) -> Result<Segment, EvalError>
where
    G: FnMut(f64) -> Result<Complex64, EvalError>,
{
    let center = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);

    let fc = g(center)?;
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = g(center - dx)? + g(center + dx)?;
        kronrod += pair * WGK[j];
        if j % 2 == 1 {
            gauss += pair * WG[j / 2];
        }
    }

    Ok(Segment {
        lo,
        hi,
        estimate: kronrod * half,
        error: ((kronrod - gauss) * half).norm(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn q() -> Quadrature {
        Quadrature::default()
    }

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() <= 1e-11 * b.norm().max(1.0)
    }

    #[test]
    fn test_polynomial_is_exact() {
        let r = q()
            .integrate(|x| Ok(x * x), Bound::Finite(0.0.into()), Bound::Finite(3.0.into()))
            .unwrap();
        assert!(close(r, Complex64::new(9.0, 0.0)));
    }

    #[test]
    fn test_reversed_bounds_negate() {
        let fwd = q()
            .integrate(|x| Ok(x.exp()), Bound::Finite(0.0.into()), Bound::Finite(1.0.into()))
            .unwrap();
        let rev = q()
            .integrate(|x| Ok(x.exp()), Bound::Finite(1.0.into()), Bound::Finite(0.0.into()))
            .unwrap();
        assert!(close(fwd, -rev));
        assert!(close(fwd, Complex64::new(std::f64::consts::E - 1.0, 0.0)));
    }

    #[test]
    fn test_gaussian_over_real_line() {
        let r = q()
            .integrate(|x| Ok((-x * x).exp()), Bound::NegInf, Bound::PosInf)
            .unwrap();
        assert!(close(r, Complex64::new(PI.sqrt(), 0.0)));
    }

    #[test]
    fn test_half_line_tails() {
        let upper = q()
            .integrate(|x| Ok((-x).exp()), Bound::Finite(0.0.into()), Bound::PosInf)
            .unwrap();
        assert!(close(upper, Complex64::new(1.0, 0.0)));
        let lower = q()
            .integrate(|x| Ok(x.exp()), Bound::NegInf, Bound::Finite(0.0.into()))
            .unwrap();
        assert!(close(lower, Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_complex_path() {
        // ∫_0^i z dz = i²/2
        let r = q()
            .integrate(|z| Ok(z), Bound::Finite(0.0.into()), Bound::Finite(Complex64::i()))
            .unwrap();
        assert!(close(r, Complex64::new(-0.5, 0.0)));
    }

    #[test]
    fn test_nan_integrand_fails() {
        let nan = q().integrate(
            |_| Ok(Complex64::new(f64::NAN, 0.0)),
            Bound::Finite(0.0.into()),
            Bound::Finite(1.0.into()),
        );
        assert!(matches!(nan, Err(EvalError::Quadrature(_))));
    }
}
