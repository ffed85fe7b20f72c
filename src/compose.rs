//! Composition primitives: the translation contract from control flow.
//!
//! The surface translator maps program structure onto these builders:
//! statements in sequence become sums, nesting becomes products, branches
//! become maxima, and recursion becomes unsolved [`Recurrence`] nodes.
//!
//! Only the trivial identities listed in the contract are applied here
//! (`0 + x = x`, `1 · x = x`, `max(x, x) = x`); everything else is purely
//! syntactic. Real simplification happens in the transformer.

use crate::core::expr::{BinaryOp, Expr};
use crate::core::source::AttributedComplexity;
use crate::core::variable::{VarKind, Variable};
use crate::recurrence::{Recurrence, RecurrenceTerm};

/// Sequential composition: `a; b` costs `a + b`.
#[must_use]
pub fn sequential(a: Expr, b: Expr) -> Expr {
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }
    Expr::binary(BinaryOp::Plus, a, b)
}

/// Nested composition: `b` inside something executed `a` times costs `a · b`.
#[must_use]
pub fn nested(a: Expr, b: Expr) -> Expr {
    if a.is_zero() || b.is_zero() {
        return Expr::constant(0.0);
    }
    if a.is_one() {
        return b;
    }
    if b.is_one() {
        return a;
    }
    Expr::binary(BinaryOp::Multiply, a, b)
}

/// Branch composition: either branch may run, so the bound is the max.
#[must_use]
pub fn branching(a: Expr, b: Expr) -> Expr {
    if a == b {
        return a;
    }
    Expr::binary(BinaryOp::Max, a, b)
}

/// Multi-way branch: left fold of [`branching`] over the cases.
#[must_use]
pub fn switch(cases: Vec<Expr>) -> Expr {
    cases
        .into_iter()
        .reduce(branching)
        .unwrap_or_else(|| Expr::constant(0.0))
}

/// A loop running `iterations` times with `body` cost per iteration.
#[must_use]
pub fn loop_of(iterations: Expr, body: Expr) -> Expr {
    nested(iterations, body)
}

/// A `for` loop over `var` elements.
#[must_use]
pub fn for_loop(var: &Variable, body: Expr) -> Expr {
    nested(Expr::var(var.clone()), body)
}

/// A loop whose counter is halved (or divided by `base`) each round.
#[must_use]
pub fn log_loop(var: &Variable, body: Expr, base: f64) -> Expr {
    nested(Expr::log_base(1.0, var.clone(), base), body)
}

/// A loop that may exit before `max_iterations`.
///
/// Worst-case analyses keep the full trip count; otherwise the bound is
/// the early-exit envelope `min(early, max)`.
#[must_use]
pub fn early_exit(max_iterations: Expr, early: Expr, body: Expr, worst_case: bool) -> Expr {
    let trips = if worst_case {
        max_iterations
    } else {
        Expr::binary(BinaryOp::Min, early, max_iterations)
    };
    nested(trips, body)
}

/// Simple recursion `T(n) = T(n − 1) + work`. Never pre-solved.
#[must_use]
pub fn linear_recursion(var: &Variable, work: Expr) -> Expr {
    let rec = Recurrence::new(
        vec![RecurrenceTerm::shifted(1.0, 1, var)],
        var.clone(),
        work,
    );
    Expr::recurrence(rec)
}

/// Divide-and-conquer recursion `T(n) = branches · T(n / divisor) + work`.
/// Never pre-solved.
#[must_use]
pub fn divide_and_conquer(branches: f64, divisor: f64, var: &Variable, work: Expr) -> Expr {
    let scale = if divisor > 0.0 { 1.0 / divisor } else { 0.0 };
    let rec = Recurrence::new(
        vec![RecurrenceTerm::scaled(branches, scale, var)],
        var.clone(),
        work,
    );
    Expr::recurrence(rec)
}

/// The classic `T(n) = 2·T(n/2) + work` shape.
#[must_use]
pub fn binary_recursion(var: &Variable, work: Expr) -> Expr {
    divide_and_conquer(2.0, 2.0, var, work)
}

/// Cost of calling a procedure whose complexity is already attributed.
#[must_use]
pub fn function_call(callee: &AttributedComplexity) -> Expr {
    callee.expression.as_ref().clone()
}

/// Per-operation cost of an amortized total: `total / var`.
///
/// Derived explicitly as `total · var⁻¹`; the divisor must be a positive
/// size-like quantity for the quotient to mean anything.
#[must_use]
pub fn amortized(total: Expr, var: &Variable) -> Expr {
    debug_assert!(
        var.kind() != VarKind::ProcessorCount,
        "amortized cost divides by an operation count, not a processor count"
    );
    nested(
        total,
        Expr::poly_log_full(1.0, -1.0, 0.0, var.clone(), 2.0),
    )
}

/// A data-dependent branch kept symbolic for provenance.
#[must_use]
pub fn conditional(description: &str, when_true: Expr, when_false: Expr) -> Expr {
    if when_true == when_false {
        return when_true;
    }
    Expr::conditional(description, when_true, when_false)
}

// ---------------------------------------------------------------------------
// Operator sugar
// ---------------------------------------------------------------------------

impl std::ops::Add for Expr {
    type Output = Self;

    /// `a + b` is sequential composition.
    fn add(self, rhs: Self) -> Self {
        sequential(self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    /// `a * b` is nested composition.
    fn mul(self, rhs: Self) -> Self {
        nested(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_identities() {
        let n = Variable::n();
        let x = Expr::var(n);
        assert_eq!(sequential(Expr::constant(0.0), x.clone()), x);
        assert_eq!(sequential(x.clone(), Expr::constant(0.0)), x);
    }

    #[test]
    fn nested_identities() {
        let n = Variable::n();
        let x = Expr::var(n);
        assert_eq!(nested(Expr::constant(1.0), x.clone()), x);
        assert_eq!(nested(Expr::constant(0.0), x.clone()), Expr::constant(0.0));
        assert_eq!(nested(x.clone(), Expr::constant(0.0)), Expr::constant(0.0));
    }

    #[test]
    fn branching_collapses_equal_branches() {
        let n = Variable::n();
        let x = Expr::var(n);
        assert_eq!(branching(x.clone(), x.clone()), x);
    }

    #[test]
    fn switch_folds_cases() {
        let n = Variable::n();
        let folded = switch(vec![
            Expr::constant(1.0),
            Expr::var(n.clone()),
            Expr::constant(5.0),
        ]);
        // max(max(1, n), 5)
        assert!(matches!(
            folded,
            Expr::Binary {
                op: BinaryOp::Max,
                ..
            }
        ));
        assert_eq!(switch(vec![]), Expr::constant(0.0));
    }

    #[test]
    fn early_exit_worst_case_keeps_full_count() {
        let n = Variable::n();
        let max_trips = Expr::var(n.clone());
        let early = Expr::constant(3.0);
        let body = Expr::constant(1.0);
        let worst = early_exit(max_trips.clone(), early.clone(), body.clone(), true);
        assert_eq!(worst, max_trips);
        let expected = early_exit(max_trips.clone(), early.clone(), body, false);
        assert_eq!(
            expected,
            Expr::binary(BinaryOp::Min, early, max_trips)
        );
    }

    #[test]
    fn recursion_builders_never_pre_solve() {
        let n = Variable::n();
        let e = binary_recursion(&n, Expr::linear(1.0, n.clone()));
        match e {
            Expr::Recurrence(rec) => {
                assert_eq!(rec.terms.len(), 1);
                assert!((rec.terms[0].coefficient - 2.0).abs() < 1e-12);
                assert!((rec.terms[0].scale - 0.5).abs() < 1e-12);
            }
            other => panic!("expected a recurrence node, got {other}"),
        }
    }

    #[test]
    fn amortized_divides_by_the_variable() {
        let n = Variable::n();
        let total = Expr::linear(1.0, n.clone());
        let per_op = amortized(total, &n);
        let mut binding = std::collections::HashMap::new();
        binding.insert("n", 64.0);
        // n / n = 1 per operation.
        assert!((per_op.evaluate(&binding).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn operator_sugar_composes() {
        let n = Variable::n();
        let e = Expr::var(n.clone()) + Expr::constant(0.0);
        assert_eq!(e, Expr::var(n.clone()));
        let e = Expr::constant(1.0) * Expr::log(1.0, n.clone());
        assert_eq!(e, Expr::log(1.0, n));
    }
}
