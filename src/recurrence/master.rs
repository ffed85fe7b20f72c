//! Master Theorem for single-term divide-and-conquer recurrences.
//!
//! `T(n) = a·T(n/b) + f(n)` with integer `a ≥ 1`, integer `b ≥ 2`, and
//! `f ∈ Θ(n^d · log^k n)`:
//!
//! - Case 1 (`d < log_b a − ε`): `Θ(n^(log_b a))`
//! - Case 2 (`|d − log_b a| ≤ ε`): `Θ(n^d · log^(k+1) n)`
//! - Case 3 (`d > log_b a + ε`, regularity holds): `Θ(f)`
//!
//! Anything outside that shape — multiple terms, fractional `a` or `b`,
//! unclassifiable `f` in the gap band — is deferred to Akra–Bazzi.

use std::collections::HashMap;

use super::Recurrence;
use super::engine::TheoremResult;
use crate::core::expr::Expr;
use crate::transform::classify::{GrowthForm, classify};

/// Gap band half-width on polynomial degree, and the integrality
/// tolerance on `a` and `b`.
pub const MASTER_DEGREE_EPSILON: f64 = 1e-2;

/// Outcome of attempting the Master Theorem.
pub(crate) enum MasterOutcome {
    /// One of the three cases applied.
    Applied(TheoremResult),
    /// The recurrence is valid but outside Master's shape; the engine
    /// should fall through to Akra–Bazzi.
    Defer(String),
    /// The recurrence is valid, Master's shape matched, but a
    /// precondition (regularity) failed.
    Failed(Vec<String>),
}

/// Try the Master Theorem on a validated divide-and-conquer recurrence.
pub(crate) fn try_master(rec: &Recurrence) -> MasterOutcome {
    if rec.terms.len() != 1 {
        return MasterOutcome::Defer("more than one recursive term".to_owned());
    }
    let term = &rec.terms[0];
    let a = term.coefficient;
    let b = 1.0 / term.scale;

    if (a - a.round()).abs() > MASTER_DEGREE_EPSILON || a < 1.0 {
        return MasterOutcome::Defer(format!("branching factor a = {a} is not a positive integer"));
    }
    if (b - b.round()).abs() > MASTER_DEGREE_EPSILON || b < 2.0 {
        return MasterOutcome::Defer(format!("division factor b = {b} is not an integer >= 2"));
    }

    let log_b_a = a.ln() / b.ln();

    let work_class = classify(&rec.work);
    let clean_poly_log = matches!(
        work_class.form,
        GrowthForm::Constant
            | GrowthForm::Logarithmic
            | GrowthForm::Polynomial
            | GrowthForm::PolyLog
    ) && work_class.confidence >= 0.9;

    if !clean_poly_log {
        return MasterOutcome::Defer("f(n) does not classify to a poly-log form".to_owned());
    }

    let d = work_class.degree;
    let k = work_class.log_exponent;
    let var = rec.variable.clone();

    let gap = (d - log_b_a).abs();

    // Case 2 band: |d − log_b a| ≤ ε with a clean poly-log f.
    if gap <= MASTER_DEGREE_EPSILON {
        let solution = Expr::poly_log(d, k + 1.0, var);
        return MasterOutcome::Applied(TheoremResult::MasterCase2 {
            solution,
            degree: d,
            log_power: k + 1.0,
            gap,
        });
    }

    if d < log_b_a {
        // Case 1: the recursion tree dominates.
        let solution = Expr::poly_log(log_b_a, 0.0, var);
        return MasterOutcome::Applied(TheoremResult::MasterCase1 {
            solution,
            log_b_a,
            gap,
        });
    }

    // Case 3: f dominates, provided the regularity condition
    // a·f(n/b) ≤ c·f(n) holds for some c < 1 on large n.
    let c_symbolic = a * b.powf(-d);
    if c_symbolic >= 1.0 - MASTER_DEGREE_EPSILON {
        return MasterOutcome::Failed(vec![format!(
            "regularity condition failed: a·b^(-d) = {c_symbolic:.4} is not < 1"
        )]);
    }
    if let Some(c_observed) = regularity_ratio(rec, a, b)
        && c_observed >= 1.0
    {
        return MasterOutcome::Failed(vec![format!(
            "regularity condition failed numerically: a·f(n/b)/f(n) = {c_observed:.4}"
        )]);
    }

    let solution = Expr::poly_log(d, k, var);
    MasterOutcome::Applied(TheoremResult::MasterCase3 {
        solution,
        regularity_constant: c_symbolic,
        gap,
    })
}

/// Largest observed `a·f(n/b)/f(n)` over a spread of sample points.
fn regularity_ratio(rec: &Recurrence, a: f64, b: f64) -> Option<f64> {
    let mut worst: Option<f64> = None;
    for &n in &[1e3, 1e5, 1e7, 1e9] {
        let mut binding = HashMap::new();
        binding.insert(rec.variable.name(), n);
        let f_n = rec.work.evaluate(&binding)?;
        binding.insert(rec.variable.name(), n / b);
        let f_scaled = rec.work.evaluate(&binding)?;
        if f_n <= 0.0 {
            return None;
        }
        let ratio = a * f_scaled / f_n;
        worst = Some(worst.map_or(ratio, |w: f64| w.max(ratio)));
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;
    use crate::recurrence::RecurrenceTerm;

    fn dnc(a: f64, b: f64, work: Expr) -> Recurrence {
        let n = Variable::n();
        Recurrence::new(
            vec![RecurrenceTerm::scaled(a, 1.0 / b, &n)],
            n,
            work,
        )
    }

    #[test]
    fn merge_sort_is_case_two() {
        let n = Variable::n();
        let rec = dnc(2.0, 2.0, Expr::linear(1.0, n.clone()));
        match try_master(&rec) {
            MasterOutcome::Applied(TheoremResult::MasterCase2 { solution, .. }) => {
                assert_eq!(solution, Expr::poly_log(1.0, 1.0, n));
            }
            _ => panic!("expected Master Case 2"),
        }
    }

    #[test]
    fn strassen_like_is_case_one() {
        let n = Variable::n();
        let rec = dnc(7.0, 2.0, Expr::poly_log(2.0, 0.0, n));
        match try_master(&rec) {
            MasterOutcome::Applied(TheoremResult::MasterCase1 { log_b_a, .. }) => {
                assert!((log_b_a - 7.0_f64.log2()).abs() < 1e-9);
            }
            _ => panic!("expected Master Case 1"),
        }
    }

    #[test]
    fn dominant_work_is_case_three() {
        let n = Variable::n();
        let rec = dnc(2.0, 2.0, Expr::poly_log(2.0, 0.0, n.clone()));
        match try_master(&rec) {
            MasterOutcome::Applied(TheoremResult::MasterCase3 { solution, .. }) => {
                assert_eq!(solution, Expr::poly_log(2.0, 0.0, n));
            }
            _ => panic!("expected Master Case 3"),
        }
    }

    #[test]
    fn fractional_division_defers() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(1.0, 2.0 / 3.0, &n)],
            n.clone(),
            Expr::var(n),
        );
        assert!(matches!(try_master(&rec), MasterOutcome::Defer(_)));
    }

    #[test]
    fn multiple_terms_defer() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![
                RecurrenceTerm::scaled(1.0, 1.0 / 3.0, &n),
                RecurrenceTerm::scaled(1.0, 2.0 / 3.0, &n),
            ],
            n.clone(),
            Expr::var(n),
        );
        assert!(matches!(try_master(&rec), MasterOutcome::Defer(_)));
    }
}
