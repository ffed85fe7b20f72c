//! Core Asymptotica Benchmarks
//!
//! Benchmarks for composition, normalization, and recurrence solving.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use asymptotica::{
    Expr, Recurrence, RecurrenceTerm, Variable, compose, normalize, solve,
};

// =============================================================================
// Fixture Builders
// =============================================================================

fn nested_loops() -> Expr {
    let n = Variable::n();
    let inner = compose::for_loop(&n, Expr::constant(3.0));
    let middle = compose::for_loop(&n, compose::sequential(inner, Expr::log(1.0, n.clone())));
    compose::sequential(middle, Expr::linear(5.0, n))
}

fn merge_sort() -> Recurrence {
    let n = Variable::n();
    Recurrence::new(
        vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
        n.clone(),
        Expr::linear(1.0, n),
    )
}

fn uneven_split() -> Recurrence {
    let n = Variable::n();
    Recurrence::new(
        vec![
            RecurrenceTerm::scaled(1.0, 1.0 / 3.0, &n),
            RecurrenceTerm::scaled(1.0, 2.0 / 3.0, &n),
        ],
        n.clone(),
        Expr::linear(1.0, n),
    )
}

fn fibonacci() -> Recurrence {
    let n = Variable::n();
    Recurrence::new(
        vec![
            RecurrenceTerm::shifted(1.0, 1, &n),
            RecurrenceTerm::shifted(1.0, 2, &n),
        ],
        n,
        Expr::constant(1.0),
    )
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let expr = nested_loops();
    group.bench_function("nested_loops", |bencher| {
        bencher.iter(|| normalize(black_box(&expr)));
    });
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let master = merge_sort();
    group.bench_function("master_case_2", |bencher| {
        bencher.iter(|| solve(black_box(&master)));
    });
    let akra = uneven_split();
    group.bench_function("akra_bazzi", |bencher| {
        bencher.iter(|| solve(black_box(&akra)));
    });
    let linear = fibonacci();
    group.bench_function("linear_roots", |bencher| {
        bencher.iter(|| solve(black_box(&linear)));
    });
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_solve);
criterion_main!(benches);
