//! Induction verifier.
//!
//! Certifies a candidate closed form against its recurrence three ways:
//! the base case holds numerically, the inductive step holds when the
//! candidate is substituted into the right-hand side on a logarithmic
//! grid of sample points, and the observed growth ratio matches the
//! candidate's asymptotic family.

use std::collections::HashMap;

use crate::core::expr::Expr;
use crate::numeric::{simulate_divide_and_conquer, simulate_linear};
use crate::recurrence::Recurrence;
use crate::transform::classify::classify;

/// Which bound the induction is asked to certify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// `c·S(n) ≥ T(n)`: an upper bound.
    Upper,
    /// `c·S(n) = Θ(T(n))`: a tight bound.
    Tight,
}

/// Outcome of the three induction checks.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    /// All three checks passed.
    pub verified: bool,
    /// The base case held.
    pub base_case: bool,
    /// The inductive step held on every grid point.
    pub inductive_step: bool,
    /// The growth ratio matched the candidate's family.
    pub asymptotic_check: bool,
    /// The positive constant the certificate uses.
    pub constant: Option<f64>,
    /// Human-readable notes on any failure.
    pub details: Vec<String>,
}

impl VerificationReport {
    fn failed(detail: String) -> Self {
        Self {
            verified: false,
            base_case: false,
            inductive_step: false,
            asymptotic_check: false,
            constant: None,
            details: vec![detail],
        }
    }
}

/// Slack tolerated on the inductive inequality.
const INDUCTIVE_SLACK: f64 = 0.05;
/// Relative band allowed on the growth-ratio check.
const RATIO_BAND: f64 = 0.2;

/// Logarithmically spaced sample grid `16, 32, ..., 32768`.
fn sample_grid() -> Vec<f64> {
    (4..16).map(|k| f64::from(1u32 << k)).collect()
}

/// Ground-truth `T(n)` by direct unrolling, for either recurrence shape.
fn simulate(rec: &Recurrence, n: f64) -> Option<f64> {
    if rec.is_subtractive() {
        let linear = rec.as_linear()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "grid points are small")]
        let steps = n as usize;
        simulate_linear(&linear, steps)
    } else {
        simulate_divide_and_conquer(rec, n)
    }
}

/// Verify `candidate` as a closed form for `rec` by induction.
#[must_use]
pub fn verify_induction(
    rec: &Recurrence,
    candidate: &Expr,
    bound: BoundKind,
) -> VerificationReport {
    let grid = sample_grid();
    let var = rec.variable.name();

    // Sample the candidate and the ground truth over the grid.
    let mut samples: Vec<(f64, f64, f64)> = Vec::with_capacity(grid.len());
    for &n in &grid {
        let mut binding = HashMap::new();
        binding.insert(var, n);
        let Some(s) = candidate.evaluate(&binding) else {
            return VerificationReport::failed(format!(
                "candidate could not be evaluated at n = {n}"
            ));
        };
        let Some(t) = simulate(rec, n) else {
            return VerificationReport::failed(format!(
                "recurrence could not be simulated at n = {n}"
            ));
        };
        if s <= 0.0 {
            return VerificationReport::failed(format!("candidate is non-positive at n = {n}"));
        }
        samples.push((n, s, t));
    }

    // The certificate constant: smallest c with c·S(n) ≥ T(n) everywhere.
    let constant = samples
        .iter()
        .map(|&(_, s, t)| t / s)
        .fold(0.0_f64, f64::max);
    if !(constant.is_finite() && constant > 0.0) {
        return VerificationReport::failed("no positive certificate constant exists".to_owned());
    }

    let mut details = Vec::new();

    // Base case at the smallest grid point.
    let (n0, s0, t0) = samples[0];
    let base_case = constant * s0 >= t0 * (1.0 - INDUCTIVE_SLACK);
    if !base_case {
        details.push(format!(
            "base case failed at n = {n0}: c·S = {:.3} < T = {t0:.3}",
            constant * s0
        ));
    }

    // Inductive step: substitute c·S for T in the right-hand side. The
    // smallest grid points are skipped; the step only has to hold on
    // large n, where lower-order noise has died down.
    let mut inductive_step = true;
    for &(n, s, _) in samples.iter().skip(2) {
        let Some(rhs) = recurrence_rhs(rec, candidate, constant, n) else {
            return VerificationReport::failed(format!(
                "right-hand side could not be evaluated at n = {n}"
            ));
        };
        let lhs = constant * s;
        let holds = match bound {
            BoundKind::Upper => lhs >= rhs * (1.0 - INDUCTIVE_SLACK),
            BoundKind::Tight => {
                lhs >= rhs * (1.0 - RATIO_BAND) && lhs <= rhs * (1.0 + RATIO_BAND)
            }
        };
        if !holds {
            inductive_step = false;
            details.push(format!(
                "inductive step failed at n = {n}: c·S = {lhs:.3} vs RHS = {rhs:.3}"
            ));
            break;
        }
    }

    // Asymptotic check: T(2n)/T(n) must match the candidate's family.
    let expected = classify(candidate);
    let mut asymptotic_check = true;
    for window in samples.windows(2) {
        let (n, _, t) = window[0];
        let (_, _, t2) = window[1];
        if let Some(predicted) = expected.growth_ratio(n) {
            let observed = t2 / t;
            if (observed - predicted).abs() > RATIO_BAND * predicted {
                asymptotic_check = false;
                details.push(format!(
                    "growth ratio at n = {n}: observed {observed:.3}, predicted {predicted:.3}"
                ));
                break;
            }
        }
    }
    // A tight bound also needs the certificate ratio T/S to stay within
    // a constant band; a drifting ratio means S has the wrong order.
    if bound == BoundKind::Tight && asymptotic_check {
        let ratios: Vec<f64> = samples.iter().map(|&(_, s, t)| t / s).collect();
        let max_ratio = ratios.iter().fold(f64::MIN, |m, &r| m.max(r));
        let min_ratio = ratios.iter().fold(f64::MAX, |m, &r| m.min(r));
        if min_ratio <= 0.0 || max_ratio / min_ratio > 2.0 {
            asymptotic_check = false;
            details.push(format!(
                "certificate ratio drifts from {min_ratio:.3} to {max_ratio:.3}"
            ));
        }
    }

    VerificationReport {
        verified: base_case && inductive_step && asymptotic_check,
        base_case,
        inductive_step,
        asymptotic_check,
        constant: Some(constant),
        details,
    }
}

/// Evaluate `Σᵢ aᵢ·c·S(argᵢ) + f(n)` with the candidate standing in for `T`.
fn recurrence_rhs(rec: &Recurrence, candidate: &Expr, c: f64, n: f64) -> Option<f64> {
    let var = rec.variable.name();
    let mut binding = HashMap::new();
    binding.insert(var, n);
    let mut total = rec.work.evaluate(&binding)?;

    for term in &rec.terms {
        let child_n = if term.is_shifted() {
            n - f64::from(term.shift)
        } else {
            term.scale * n
        };
        if child_n < 1.0 {
            continue; // below the base region
        }
        let mut child_binding = HashMap::new();
        child_binding.insert(var, child_n);
        let s_child = candidate.evaluate(&child_binding)?;
        total += term.coefficient * c * s_child;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;
    use crate::recurrence::RecurrenceTerm;

    #[test]
    fn merge_sort_certificate() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        let candidate = Expr::poly_log(1.0, 1.0, n);
        let report = verify_induction(&rec, &candidate, BoundKind::Upper);
        assert!(report.verified, "details: {:?}", report.details);
        assert!(report.constant.unwrap() > 0.0);
    }

    #[test]
    fn wrong_candidate_fails() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        // Θ(n) under-counts merge sort.
        let candidate = Expr::var(n);
        let report = verify_induction(&rec, &candidate, BoundKind::Tight);
        assert!(!report.verified);
    }

    #[test]
    fn karatsuba_upper_bound() {
        // T(n) = 3T(n/2) + n, candidate Θ(n^log2 3)
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(3.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        let candidate = Expr::poly_log(3.0_f64.log2(), 0.0, n);
        let report = verify_induction(&rec, &candidate, BoundKind::Upper);
        assert!(report.verified, "details: {:?}", report.details);
        assert!(report.constant.unwrap() > 0.0);
    }

    #[test]
    fn subtractive_recurrences_verify_too() {
        // T(n) = T(n-1) + n, candidate Θ(n²)
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::shifted(1.0, 1, &n)],
            n.clone(),
            Expr::linear(1.0, n.clone()),
        );
        let candidate = Expr::poly_log(2.0, 0.0, n);
        let report = verify_induction(&rec, &candidate, BoundKind::Upper);
        assert!(report.verified, "details: {:?}", report.details);
    }
}
