use crate::{Assumptions, ChangeOutcome, EquivalenceOracle, Expr, Symbol, remove, symbols};

#[test]
fn test_remove_reports_broken_change() {
    let xyz = symbols("x y z", &Assumptions::positive());
    let [x, y, z] = [xyz[0].to_expr(), xyz[1].to_expr(), xyz[2].to_expr()];
    let product = x.clone() * y.clone() * z.clone();

    let mut oracle = EquivalenceOracle::new();
    let outcome = oracle
        .change(&product, |e| remove(e, &[x.clone(), y.clone()]), &xyz)
        .unwrap();
    match outcome {
        ChangeOutcome::Broken(record) => assert_eq!(record.expr2, z),
        ChangeOutcome::Preserved(e) => panic!("removing factors kept the value: {e}"),
    }
}

#[test]
fn test_remove_unit_factor_preserves_value() {
    let a = Symbol::new("a", Assumptions::real());
    let one_term = Expr::pow(a.to_expr(), Expr::integer(0)) * a.to_expr();
    // a^0 folds to 1, so nothing is left to remove
    let mut oracle = EquivalenceOracle::new();
    let outcome = oracle
        .change(&one_term, |e| remove(e, &[Expr::integer(1)]), &[a.clone()])
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Preserved(a.to_expr()));
}

#[test]
fn test_remove_term_from_nested_sum() {
    let abc = symbols("a, b, c", &Assumptions::real());
    let [a, b, c] = [abc[0].to_expr(), abc[1].to_expr(), abc[2].to_expr()];
    let expr = (a.clone() + b.clone()).sin() + c.clone() * (a.clone() + 2);
    let stripped = remove(&expr, &[a.clone()]);
    assert_eq!(stripped, b.sin() + c * 2);
}
