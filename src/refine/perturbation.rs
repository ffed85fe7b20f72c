//! Perturbation expansion for the Master Case-2 gap band.
//!
//! When `f(n) = Θ(n^d · log^k n · (1 + o(1)))` sits within the epsilon
//! band of `log_b a` without hitting it exactly, the clean Case-2 answer
//! picks up a correction from the recursion tree. The expansion keeps
//! both the corrected work term and the tree term and lets the
//! normalizer keep whichever dominates.

use crate::core::expr::Expr;
use crate::recurrence::Recurrence;
use crate::transform::normalize;

/// Expand a near-gap Case-2 solution and keep the dominant correction.
///
/// `degree` and `log_power` are the exponents of the already-computed
/// Case-2 answer `Θ(n^degree · log^log_power n)`.
#[must_use]
pub fn perturb_case_two(rec: &Recurrence, degree: f64, log_power: f64) -> Expr {
    let var = rec.variable.clone();
    let case_two = Expr::poly_log(degree, log_power, var.clone());

    // The tree term n^(log_b a) of the (single) recursive term; with the
    // gap open it differs from n^degree by n^±ε.
    let Some(term) = rec.terms.first() else {
        return case_two;
    };
    if term.scale <= 0.0 || term.scale >= 1.0 || term.coefficient <= 0.0 {
        return case_two;
    }
    let log_b_a = term.coefficient.ln() / (1.0 / term.scale).ln();
    let tree = Expr::poly_log(log_b_a, 0.0, var);

    normalize(&Expr::plus(case_two, tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;
    use crate::recurrence::RecurrenceTerm;

    #[test]
    fn exact_balance_keeps_case_two() {
        // T(n) = 2T(n/2) + n: the tree term n^1 is dominated by n·log n.
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        let expanded = perturb_case_two(&rec, 1.0, 1.0);
        assert_eq!(expanded, Expr::poly_log(1.0, 1.0, n));
    }

    #[test]
    fn open_gap_promotes_the_tree_term() {
        // f = n^0.99 against log_b a = 1: the tree term n^1 wins.
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::poly_log(0.99, 0.0, n.clone()),
        );
        let expanded = perturb_case_two(&rec, 0.99, 1.0);
        assert_eq!(expanded, Expr::poly_log(1.0, 0.0, n));
    }
}
