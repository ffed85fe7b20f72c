// End-to-end scenarios: classic recurrences through the whole engine.

use std::collections::HashMap;

use crate::core::expr::Expr;
use crate::core::variable::Variable;
use crate::recurrence::{
    MutualComponent, MutualSystem, Recurrence, RecurrenceTerm, TheoremResult, solve, solve_mutual,
};
use crate::refine::{BoundKind, verify_induction};
use crate::transform::classify;

fn n() -> Variable {
    Variable::n()
}

fn eval_at(e: &Expr, x: f64) -> f64 {
    let mut binding = HashMap::new();
    binding.insert("n", x);
    e.evaluate(&binding).expect("solution should evaluate")
}

fn dnc(a: f64, b: f64, work: Expr) -> Recurrence {
    Recurrence::new(
        vec![RecurrenceTerm::scaled(a, 1.0 / b, &n())],
        n(),
        work,
    )
}

#[test]
fn merge_sort_is_n_log_n() {
    // T(n) = 2T(n/2) + n
    let result = solve(&dnc(2.0, 2.0, Expr::linear(1.0, n())));
    let TheoremResult::MasterCase2 { solution, .. } = &result else {
        panic!("expected Master case 2, got {}", result.describe());
    };
    assert_eq!(solution.big_o(), "O(n * log(n))");
    // n·log n at 1024 = 10240; the solved form must agree within 2x.
    let value = eval_at(solution, 1024.0);
    assert!(value > 5_120.0 && value < 20_480.0, "{value}");
}

#[test]
fn binary_search_is_logarithmic() {
    // T(n) = T(n/2) + 1
    let result = solve(&dnc(1.0, 2.0, Expr::constant(1.0)));
    let solution = result.solution().expect("should solve");
    assert_eq!(solution.big_o(), "O(log(n))");
    let value = eval_at(solution, 1024.0);
    assert!((value - 10.0).abs() < 1.0, "{value}");
}

#[test]
fn karatsuba_exponent() {
    // T(n) = 3T(n/2) + n -> Θ(n^log2 3)
    let result = solve(&dnc(3.0, 2.0, Expr::linear(1.0, n())));
    let TheoremResult::MasterCase1 { log_b_a, solution, .. } = &result else {
        panic!("expected Master case 1, got {}", result.describe());
    };
    assert!((log_b_a - 1.585).abs() < 1e-3);
    assert!((classify(solution).degree - 1.585).abs() < 1e-3);
}

#[test]
fn strassen_exponent() {
    // T(n) = 7T(n/2) + n² -> Θ(n^log2 7)
    let result = solve(&dnc(7.0, 2.0, Expr::poly_log(2.0, 0.0, n())));
    let TheoremResult::MasterCase1 { log_b_a, .. } = &result else {
        panic!("expected Master case 1, got {}", result.describe());
    };
    assert!((log_b_a - 2.807).abs() < 1e-3);
}

#[test]
fn insertion_sort_recurrence_is_quadratic() {
    // T(n) = T(n-1) + n
    let rec = Recurrence::new(
        vec![RecurrenceTerm::shifted(1.0, 1, &n())],
        n(),
        Expr::linear(1.0, n()),
    );
    let result = solve(&rec);
    let solution = result.solution().expect("should solve");
    assert_eq!(solution.big_o(), "O(n^2)");
    let ratio = eval_at(solution, 100.0) / eval_at(solution, 50.0);
    assert!((ratio - 4.0).abs() < 0.4, "{ratio}");
}

#[test]
fn fibonacci_dominant_root_is_golden() {
    // T(n) = T(n-1) + T(n-2) + 1
    let rec = Recurrence::new(
        vec![
            RecurrenceTerm::shifted(1.0, 1, &n()),
            RecurrenceTerm::shifted(1.0, 2, &n()),
        ],
        n(),
        Expr::constant(1.0),
    );
    let result = solve(&rec);
    let TheoremResult::LinearSolved { evidence, solution } = &result else {
        panic!("expected linear solution, got {}", result.describe());
    };
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    assert!((evidence.dominant_root - phi).abs() < 1e-2);
    assert!(matches!(solution, Expr::Exp { .. }));
}

#[test]
fn mutual_pair_with_constant_work_is_linear() {
    let system = MutualSystem::new(
        vec![
            MutualComponent::new("ping", 1.0, Expr::constant(1.0)),
            MutualComponent::new("pong", 1.0, Expr::constant(1.0)),
        ],
        n(),
    );
    let outcome = solve_mutual(&system);
    assert_eq!(outcome.per_component.len(), 2);
    for (_, solution) in &outcome.per_component {
        assert_eq!(solution.big_o(), "O(n)");
    }
}

#[test]
fn akra_bazzi_uneven_split() {
    // T(n) = T(n/3) + T(2n/3) + n -> p* = 1, Θ(n log n)
    let rec = Recurrence::new(
        vec![
            RecurrenceTerm::scaled(1.0, 1.0 / 3.0, &n()),
            RecurrenceTerm::scaled(1.0, 2.0 / 3.0, &n()),
        ],
        n(),
        Expr::linear(1.0, n()),
    );
    let result = solve(&rec);
    let TheoremResult::AkraBazzi {
        solution,
        critical_exponent,
        ..
    } = &result
    else {
        panic!("expected Akra-Bazzi, got {}", result.describe());
    };
    assert!((critical_exponent - 1.0).abs() < 1e-6);
    assert_eq!(solution.big_o(), "O(n * log(n))");
}

#[test]
fn karatsuba_induction_certificate() {
    let rec = dnc(3.0, 2.0, Expr::linear(1.0, n()));
    let solution = solve(&rec).solution().expect("should solve").clone();
    let report = verify_induction(&rec, &solution, BoundKind::Upper);
    assert!(report.verified, "details: {:?}", report.details);
    assert!(report.constant.expect("certificate constant") > 0.0);
}

#[test]
fn solved_growth_ratios_match_expectations() {
    // S(2n)/S(n) must track 2^d · (log 2n / log n)^k within 20%.
    let cases = [
        (dnc(2.0, 2.0, Expr::linear(1.0, n())), 1.0, 1.0),
        (dnc(7.0, 2.0, Expr::poly_log(2.0, 0.0, n())), 2.807, 0.0),
    ];
    for (rec, degree, log_exp) in cases {
        let solution = solve(&rec).solution().expect("should solve").clone();
        for base in [100.0, 200.0, 400.0, 800.0] {
            let observed = eval_at(&solution, 2.0 * base) / eval_at(&solution, base);
            let expected = 2.0_f64.powf(degree)
                * ((2.0 * base).log2() / base.log2()).powf(log_exp);
            assert!(
                (observed - expected).abs() < 0.2 * expected,
                "n = {base}: observed {observed}, expected {expected}"
            );
        }
    }
}
