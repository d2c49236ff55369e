use num_complex::Complex64;

use crate::{
    ArbitraryPrecisionBackend, Assumptions, EquivalenceOracle, EvalMode, Expr, NumericEvaluator,
    StandardBackend, Symbol, TestVector,
};

/// `re(x + 10^16) - 10^16`, which is `x` for real `x`
fn cancelling(x: &Symbol) -> Expr {
    let huge = Expr::integer(10_i64.pow(16));
    (x.to_expr() + huge.clone()).re() - huge
}

#[test]
fn test_double_precision_loses_cancellation() {
    let x = Symbol::new("x", Assumptions::real());
    let mut oracle = EquivalenceOracle::new();
    let record = oracle
        .compare(&cancelling(&x), &x.to_expr(), &[x.clone()])
        .unwrap()
        .expect("10^16 + 5 is not representable");
    assert_eq!(record.vector[0], Expr::integer(5));
}

#[test]
fn test_exact_backend_keeps_cancellation() {
    let x = Symbol::new("x", Assumptions::real());
    let mut oracle = EquivalenceOracle::new().backend(ArbitraryPrecisionBackend::new());
    assert!(
        oracle
            .compare(&cancelling(&x), &x.to_expr(), &[x.clone()])
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_backends_agree_on_ordinary_expressions() {
    let z = Symbol::new("z", Assumptions::complex());
    let expr = (z.to_expr().pow_of(3) - z.to_expr()).exp() / (z.to_expr() + Expr::pi());
    let vector = TestVector::new(vec![Expr::rational(3, 2) + Expr::integer(-2) * Expr::i()]);

    let standard = NumericEvaluator::new(StandardBackend::new())
        .evaluate(&expr, &[z.clone()], &vector, EvalMode::Standard)
        .unwrap();
    let exact = NumericEvaluator::new(ArbitraryPrecisionBackend::new())
        .evaluate(&expr, &[z], &vector, EvalMode::Standard)
        .unwrap();
    assert!((standard - exact).norm() <= 1e-12 * exact.norm());
}

#[test]
fn test_exact_backend_with_integral() {
    let t = Symbol::new("t", Assumptions::real());
    let a = Symbol::new("a", Assumptions::positive());
    let integral = Expr::integral(t.pow(3), t, Expr::integer(0), a.to_expr());
    let vector = TestVector::new(vec![Expr::integer(2)]);
    let value = NumericEvaluator::new(ArbitraryPrecisionBackend::new())
        .evaluate(&integral, &[a], &vector, EvalMode::Standard)
        .unwrap();
    assert!((value - Complex64::new(4.0, 0.0)).norm() < 1e-12);
}
