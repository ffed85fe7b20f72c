//! Refinement, verification, and confidence.
//!
//! The theorem engine's answers pass through here before they are handed
//! to callers: the induction verifier certifies them against simulated
//! ground truth, the slack optimizer tightens the leading constant, the
//! perturbation expansion patches near-gap Case-2 answers, and the
//! confidence scorer condenses everything into one number.

pub mod confidence;
pub mod induction;
pub(crate) mod perturbation;
pub(crate) mod slack;

use crate::core::expr::Expr;
use crate::recurrence::{Recurrence, TheoremResult};

pub use confidence::{
    ConfidenceAssessment, ConfidenceContext, ConfidenceLevel, consensus_boost, score_confidence,
};
pub use induction::{BoundKind, VerificationReport, verify_induction};
pub use perturbation::perturb_case_two;
pub use slack::{SlackFit, fit_constant};

/// Outcome of refining a theorem result.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementResult {
    /// The refined (or confirmed) expression.
    pub expression: Expr,
    /// The induction verifier's report.
    pub verification: VerificationReport,
    /// Fitted leading constant, when the slack fit succeeded.
    pub fitted_constant: Option<f64>,
    /// Fit quality, when the slack fit succeeded.
    pub r_squared: Option<f64>,
    /// Whether the original theorem solution was kept unchanged.
    pub kept_original: bool,
}

/// Refine a solved recurrence: perturb near-gap Case-2 answers, verify
/// by induction, and fit the leading constant.
#[must_use]
pub fn refine(rec: &Recurrence, theorem: &TheoremResult) -> RefinementResult {
    let Some(original) = theorem.solution() else {
        return RefinementResult {
            expression: Expr::constant(0.0),
            verification: verify_induction(rec, &Expr::constant(0.0), BoundKind::Upper),
            fitted_constant: None,
            r_squared: None,
            kept_original: true,
        };
    };

    // Near-gap Case 2 gets the perturbation expansion; everything else
    // is taken as-is.
    let candidate = match theorem {
        TheoremResult::MasterCase2 {
            degree, log_power, ..
        } if theorem.near_case_boundary() => {
            perturb_case_two(rec, *degree, *log_power)
        }
        _ => original.clone(),
    };
    let kept_original = candidate == *original;

    let verification = verify_induction(rec, &candidate, BoundKind::Tight);
    let fit = fit_constant(rec, &candidate);

    RefinementResult {
        expression: candidate,
        verification,
        fitted_constant: fit.map(|f| f.constant),
        r_squared: fit.map(|f| f.r_squared),
        kept_original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;
    use crate::recurrence::{RecurrenceTerm, solve};

    #[test]
    fn refines_merge_sort_and_verifies() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        let theorem = solve(&rec);
        let refined = refine(&rec, &theorem);
        assert!(refined.kept_original);
        assert!(refined.verification.verified, "{:?}", refined.verification.details);
        assert!(refined.r_squared.unwrap() > 0.99);
        assert_eq!(refined.expression, Expr::poly_log(1.0, 1.0, n));
    }
}
