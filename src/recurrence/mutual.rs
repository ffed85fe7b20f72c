//! Mutual-recursion reducer.
//!
//! A strongly connected component `A → B → ... → A` with an integer
//! argument reduction on each edge collapses to one subtractive
//! recurrence: one traversal of the cycle shrinks the argument by the
//! total step `s` and pays every member's work, so
//! `T(n) = T(n − s) + Σᵢ Wᵢ(n)`. Every member of the component is
//! assigned the same asymptotic solution.

use super::engine::{MutualResult, TheoremResult};
use super::linear::solve_linear_recurrence;
use super::{LinearRecurrence, MutualSystem};
use crate::compose;
use crate::core::expr::Expr;
use crate::transform::simplify;

/// Collapse and solve a mutual system.
pub(crate) fn solve_mutual_system(system: &MutualSystem) -> MutualResult {
    if system.components.is_empty() {
        return MutualResult {
            per_component: Vec::new(),
            collapsed: None,
            result: TheoremResult::NotApplicable {
                reasons: vec!["empty mutual system".to_owned()],
            },
        };
    }
    for component in &system.components {
        if !(component.step.is_finite() && component.step > 0.0) {
            return MutualResult {
                per_component: Vec::new(),
                collapsed: None,
                result: TheoremResult::NotApplicable {
                    reasons: vec![format!(
                        "component {} has a non-positive reduction step",
                        component.name
                    )],
                },
            };
        }
    }

    // Total reduction over one cycle traversal. Non-uniform edge steps
    // are allowed; the cycle length is their (contribution-weighted) sum
    // rounded to the nearest representable integer step.
    let total_step: f64 = system.components.iter().map(|c| c.step).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "steps are small")]
    let s = (total_step.round().max(1.0)) as u32;

    // One traversal pays every member's work.
    let combined_work = simplify(
        &system
            .components
            .iter()
            .map(|c| c.work.as_ref().clone())
            .fold(Expr::constant(0.0), compose::sequential),
    );

    let mut coefficients = vec![0.0; s as usize];
    coefficients[s as usize - 1] = 1.0;
    let collapsed = LinearRecurrence::new(coefficients, system.variable.clone(), combined_work);

    let result = solve_linear_recurrence(&collapsed);
    let per_component = match result.solution() {
        Some(solution) => system
            .components
            .iter()
            .map(|c| (c.name.clone(), solution.clone()))
            .collect(),
        None => Vec::new(),
    };

    MutualResult {
        per_component,
        collapsed: Some(collapsed),
        result,
    }
}
