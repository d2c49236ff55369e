//! Magnitude-aware comparison to a number of significant decimal digits.
//!
//! Both values are normalized to `m × 10^p` with `1 ≤ m < 10`. Exponents
//! more than one apart are never equal. When they differ by exactly one, the
//! mantissa with the smaller exponent is shifted down a place so `0.99…` and
//! `1.0` can still agree. The mantissas are then rounded (ties to even) to
//! `digits` significant digits and compared.

use tracing::trace;

/// Largest power of ten applied in one scaling step
const MAX_SCALE_STEP: i32 = 300;

/// Multiply by `10^k` without overflowing the intermediate power
fn scale_by_power_of_ten(mut x: f64, mut k: i32) -> f64 {
    while k > MAX_SCALE_STEP {
        x *= 10f64.powi(MAX_SCALE_STEP);
        k -= MAX_SCALE_STEP;
    }
    while k < -MAX_SCALE_STEP {
        x /= 10f64.powi(MAX_SCALE_STEP);
        k += MAX_SCALE_STEP;
    }
    if k >= 0 {
        x * 10f64.powi(k)
    } else {
        x / 10f64.powi(-k)
    }
}

/// Normalize `n` to `(m, p)` with `n = m × 10^p` and `1 ≤ |m| < 10`.
///
/// Zero and non-finite inputs are returned unchanged with exponent 0.
///
/// ```
/// use symb_equiv::convert_to_order_one;
///
/// let (m, p) = convert_to_order_one(110_000.0);
/// assert_eq!(p, 5);
/// assert!((m - 1.1).abs() < 1e-12);
/// ```
#[must_use]
pub fn convert_to_order_one(n: f64) -> (f64, i32) {
    if n == 0.0 || !n.is_finite() {
        return (n, 0);
    }
    // |log10| of a finite double is below 400
    #[allow(clippy::cast_possible_truncation)]
    let mut places = n.abs().log10().floor() as i32;
    let mut m = scale_by_power_of_ten(n, -places);
    if m.abs() >= 10.0 {
        m /= 10.0;
        places += 1;
    } else if m.abs() < 1.0 {
        m *= 10.0;
        places -= 1;
    }
    (m, places)
}

/// Whether `a` and `b` agree to `digits` significant digits.
///
/// Exact zeros only equal each other, opposite signs never agree, and a
/// non-finite input never agrees with anything.
#[must_use]
pub fn compare_to_significance(a: f64, b: f64, digits: u32) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    match (a == 0.0, b == 0.0) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }
    if a.is_sign_negative() != b.is_sign_negative() {
        return false;
    }

    let (mut ma, pa) = convert_to_order_one(a.abs());
    let (mut mb, pb) = convert_to_order_one(b.abs());
    match pa - pb {
        0 => {}
        1 => mb /= 10.0,
        -1 => ma /= 10.0,
        _ => return false,
    }

    let places = i32::try_from(digits).unwrap_or(i32::MAX).min(308) - 1;
    let ra = scale_by_power_of_ten(ma, places).round_ties_even();
    let rb = scale_by_power_of_ten(mb, places).round_ties_even();
    trace!(target: "symb_equiv::significance", a, b, digits, ra, rb, "compared");
    ra == rb
}

/// Both parts of two complex numbers agree to `digits` significant digits
#[must_use]
pub fn compare_to_significance_complex(a_re: f64, a_im: f64, b_re: f64, b_im: f64, digits: u32) -> bool {
    compare_to_significance(a_re, b_re, digits) && compare_to_significance(a_im, b_im, digits)
}
