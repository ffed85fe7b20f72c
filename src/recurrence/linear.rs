//! Characteristic-polynomial solver for linear subtractive recurrences.
//!
//! `T(n) = Σᵢ cᵢ·T(n−i) + f(n)`:
//!
//! - the homogeneous part is `Θ(n^(m−1) · |r|^n)` where `r` is the
//!   dominant-magnitude root of the characteristic polynomial and `m`
//!   its multiplicity;
//! - the particular part follows `f` with the summation rule applied
//!   once per unit of multiplicity of the resonant root (`1` for
//!   poly-log work, `α` for exponential work `α^n`);
//! - the answer is the asymptotic max of the two.

use super::LinearRecurrence;
use super::engine::{LinearEvidence, TheoremResult};
use crate::core::expr::Expr;
use crate::numeric::{characteristic_roots, dominant_root, group_roots};
use crate::transform::classify::{GrowthForm, classify};

/// Roots within this distance of a target count as resonant.
const RESONANCE_EPS: f64 = 1e-6;

/// Solve a linear subtractive recurrence.
pub(crate) fn solve_linear_recurrence(rec: &LinearRecurrence) -> TheoremResult {
    let order = rec.order();
    if order == 0 {
        return TheoremResult::NotApplicable {
            reasons: vec!["empty coefficient list".to_owned()],
        };
    }
    for (i, &c) in rec.coefficients.iter().enumerate() {
        if !c.is_finite() {
            return TheoremResult::NotApplicable {
                reasons: vec![format!("coefficient c{} is not finite", i + 1)],
            };
        }
    }

    let var = rec.variable.clone();
    let work_class = classify(&rec.work);

    // Degenerate summation T(n) = T(n−1) + f(n): the antiderivative
    // bound directly, without root finding.
    if order == 1 && (rec.coefficients[0] - 1.0).abs() < RESONANCE_EPS {
        let solution = match summation_bound(&work_class, &var) {
            Some(expr) => expr,
            None => {
                return TheoremResult::NotApplicable {
                    reasons: vec!["unclassifiable work term".to_owned()],
                };
            }
        };
        return TheoremResult::LinearSolved {
            solution,
            evidence: LinearEvidence {
                dominant_root: 1.0,
                multiplicity: 1,
                distinct_roots: 1,
            },
        };
    }

    let Some(roots) = characteristic_roots(&rec.coefficients) else {
        return TheoremResult::NotApplicable {
            reasons: vec!["characteristic root finding did not converge".to_owned()],
        };
    };
    let clusters = group_roots(&roots);
    let Some((r_max, m_max)) = dominant_root(&roots) else {
        return TheoremResult::NotApplicable {
            reasons: vec!["characteristic polynomial has no roots".to_owned()],
        };
    };
    let magnitude = r_max.norm();

    // Homogeneous bound Θ(n^(m−1) · |r|^n).
    #[allow(clippy::cast_precision_loss, reason = "multiplicities are tiny")]
    let poly_order = (m_max - 1) as f64;
    let homogeneous = if magnitude > 1.0 + RESONANCE_EPS {
        Expr::times(
            Expr::poly_log(poly_order, 0.0, var.clone()),
            Expr::exp(magnitude, var.clone()),
        )
    } else if magnitude > 1.0 - RESONANCE_EPS {
        Expr::poly_log(poly_order, 0.0, var.clone())
    } else {
        // Decaying homogeneous solution.
        Expr::constant(1.0)
    };

    // Multiplicity of the root at a given real point.
    let multiplicity_at = |target: f64| {
        clusters
            .iter()
            .find(|(rep, _)| {
                (rep.re - target).abs() < RESONANCE_EPS && rep.im.abs() < RESONANCE_EPS
            })
            .map_or(0, |(_, m)| *m)
    };

    let particular = match work_class.form {
        GrowthForm::Constant if work_class.leading_coef == 0.0 => None,
        GrowthForm::Constant
        | GrowthForm::Logarithmic
        | GrowthForm::Polynomial
        | GrowthForm::PolyLog => {
            #[allow(clippy::cast_precision_loss, reason = "multiplicities are tiny")]
            let lift = multiplicity_at(1.0) as f64;
            Some(Expr::poly_log(
                work_class.degree + lift,
                work_class.log_exponent,
                var.clone(),
            ))
        }
        GrowthForm::Exponential => {
            let alpha = work_class.base;
            #[allow(clippy::cast_precision_loss, reason = "multiplicities are tiny")]
            let lift = multiplicity_at(alpha) as f64;
            let exp_part = Expr::exp(alpha, var.clone());
            Some(if lift > 0.0 {
                Expr::times(Expr::poly_log(lift, 0.0, var.clone()), exp_part)
            } else {
                exp_part
            })
        }
        GrowthForm::Factorial | GrowthForm::Unknown => {
            return TheoremResult::NotApplicable {
                reasons: vec!["unclassifiable work term".to_owned()],
            };
        }
    };

    // Total: asymptotic max of homogeneous and particular parts.
    let solution = match particular {
        None => homogeneous,
        Some(part) => {
            let keep_particular = classify(&homogeneous)
                .cmp_asymptotic(&classify(&part))
                .is_lt();
            if keep_particular { part } else { homogeneous }
        }
    };

    TheoremResult::LinearSolved {
        solution,
        evidence: LinearEvidence {
            dominant_root: magnitude,
            multiplicity: m_max,
            distinct_roots: clusters.len(),
        },
    }
}

/// Summation rule `Σᵢⁿ i^d·log^k i = Θ(n^(d+1)·log^k n)` for the
/// degenerate recurrence, with the exponential escape hatch.
fn summation_bound(
    work_class: &crate::transform::classify::Classification,
    var: &crate::core::variable::Variable,
) -> Option<Expr> {
    match work_class.form {
        GrowthForm::Constant if work_class.leading_coef == 0.0 => Some(Expr::constant(1.0)),
        GrowthForm::Constant
        | GrowthForm::Logarithmic
        | GrowthForm::Polynomial
        | GrowthForm::PolyLog => Some(Expr::poly_log(
            work_class.degree + 1.0,
            work_class.log_exponent,
            var.clone(),
        )),
        GrowthForm::Exponential if work_class.base > 1.0 + RESONANCE_EPS => {
            // Geometric sums are dominated by their last term.
            Some(Expr::exp(work_class.base, var.clone()))
        }
        GrowthForm::Exponential => Some(Expr::poly_log(1.0, 0.0, var.clone())),
        GrowthForm::Factorial | GrowthForm::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;

    #[test]
    fn arithmetic_sum_is_quadratic() {
        // T(n) = T(n−1) + n = Θ(n²)
        let n = Variable::n();
        let rec = LinearRecurrence::new(vec![1.0], n.clone(), Expr::linear(1.0, n.clone()));
        match solve_linear_recurrence(&rec) {
            TheoremResult::LinearSolved { solution, .. } => {
                assert_eq!(solution, Expr::poly_log(2.0, 0.0, n));
            }
            other => panic!("expected a linear solution, got {}", other.describe()),
        }
    }

    #[test]
    fn fibonacci_dominant_root_is_phi() {
        let n = Variable::n();
        let rec = LinearRecurrence::new(
            vec![1.0, 1.0],
            n.clone(),
            Expr::constant(1.0),
        );
        match solve_linear_recurrence(&rec) {
            TheoremResult::LinearSolved { solution, evidence } => {
                let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
                assert!((evidence.dominant_root - phi).abs() < 1e-2);
                match solution {
                    Expr::Exp { base, .. } => assert!((base - phi).abs() < 1e-6),
                    other => panic!("expected exponential solution, got {other}"),
                }
            }
            other => panic!("expected a linear solution, got {}", other.describe()),
        }
    }

    #[test]
    fn repeated_unit_root_lifts_the_particular_degree() {
        // T(n) = 2T(n−1) − T(n−2) + 1: (x−1)², particular Θ(n²)
        let n = Variable::n();
        let rec = LinearRecurrence::new(
            vec![2.0, -1.0],
            n.clone(),
            Expr::constant(1.0),
        );
        match solve_linear_recurrence(&rec) {
            TheoremResult::LinearSolved { solution, evidence } => {
                assert_eq!(evidence.multiplicity, 2);
                assert_eq!(solution, Expr::poly_log(2.0, 0.0, n));
            }
            other => panic!("expected a linear solution, got {}", other.describe()),
        }
    }

    #[test]
    fn resonant_exponential_work() {
        // T(n) = 2T(n−1) + 2^n: α = 2 is a root, particular Θ(n·2^n)
        let n = Variable::n();
        let rec = LinearRecurrence::new(
            vec![2.0],
            n.clone(),
            Expr::exp(2.0, n.clone()),
        );
        match solve_linear_recurrence(&rec) {
            TheoremResult::LinearSolved { solution, .. } => {
                let text = format!("{solution}");
                assert!(text.contains("2^n"), "got {text}");
                assert!(text.contains('n'), "got {text}");
            }
            other => panic!("expected a linear solution, got {}", other.describe()),
        }
    }

    #[test]
    fn empty_recurrence_is_not_applicable() {
        let n = Variable::n();
        let rec = LinearRecurrence::new(vec![], n.clone(), Expr::var(n));
        assert!(matches!(
            solve_linear_recurrence(&rec),
            TheoremResult::NotApplicable { .. }
        ));
    }
}
