//! Oracle Benchmark
//!
//! Full comparisons through the oracle: a polynomial identity, a comparison
//! with an unevaluated integral (standard plus thorough pass), and the same
//! polynomial identity on the exact backend.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symb_equiv::{ArbitraryPrecisionBackend, Assumptions, EquivalenceOracle, Expr, Symbol};

// =============================================================================
// Expression Generators
// =============================================================================

/// `(x + y)^n` and its binomial expansion
fn binomial(n: i64, x: &Symbol, y: &Symbol) -> (Expr, Expr) {
    let power = (x.to_expr() + y.to_expr()).pow_of(n);
    let mut terms = Vec::new();
    let mut coefficient: i64 = 1;
    for k in 0..=n {
        terms.push(Expr::integer(coefficient) * x.pow(n - k) * y.pow(k));
        coefficient = coefficient * (n - k) / (k + 1);
    }
    (power, Expr::sum(terms))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_polynomial_identity(c: &mut Criterion) {
    let x = Symbol::new("x", Assumptions::real());
    let y = Symbol::new("y", Assumptions::complex());
    let (lhs, rhs) = binomial(8, &x, &y);
    let vars = [x, y];

    c.bench_function("binomial_8_standard", |b| {
        b.iter(|| {
            // a fresh oracle each time so the cache does not answer
            let mut oracle = EquivalenceOracle::new();
            black_box(oracle.compare(black_box(&lhs), black_box(&rhs), &vars))
        });
    });

    c.bench_function("binomial_8_exact", |b| {
        b.iter(|| {
            let mut oracle = EquivalenceOracle::new().backend(ArbitraryPrecisionBackend::new());
            black_box(oracle.compare(black_box(&lhs), black_box(&rhs), &vars))
        });
    });
}

fn bench_integral(c: &mut Criterion) {
    let t = Symbol::new("t", Assumptions::real());
    let a = Symbol::new("a", Assumptions::positive());
    let gaussian = Expr::integral(
        Expr::neg_expr(t.pow(2) / a.pow(2)).exp(),
        t,
        Expr::neg_infinity(),
        Expr::infinity(),
    );
    let closed = Expr::pi().sqrt() * a.to_expr();
    let vars = [a];

    c.bench_function("gaussian_integral", |b| {
        b.iter(|| {
            let mut oracle = EquivalenceOracle::new();
            black_box(oracle.compare(black_box(&gaussian), black_box(&closed), &vars))
        });
    });
}

criterion_group!(benches, bench_polynomial_identity, bench_integral);
criterion_main!(benches);
