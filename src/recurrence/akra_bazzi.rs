//! Akra–Bazzi solver for multi-term divide-and-conquer recurrences.
//!
//! For `T(n) = Σᵢ aᵢ·T(bᵢ·n) + f(n)` the theorem gives
//! `T(n) = Θ(n^p · (1 + ∫₁ⁿ f(u)/u^(p+1) du))` where `p` solves
//! `Σ aᵢ·bᵢ^p = 1`. When `f ∈ Θ(n^d · log^k n)` the integral has a
//! closed form and the engine prefers it; otherwise the symbolic
//! integral is returned for the refinement layer to bound numerically.

use super::Recurrence;
use super::engine::TheoremResult;
use crate::core::error::SolverError;
use crate::core::expr::Expr;
use crate::core::variable::{VarKind, Variable};
use crate::numeric::critical_exponent;
use crate::transform::classify::{GrowthForm, classify};

/// Tolerance for `d = p*` in the closed-form case split. The critical
/// exponent is itself only known to the Newton tolerance.
const EXPONENT_EPS: f64 = 1e-6;

/// Solve a validated multi-term (or non-integer) divide-and-conquer
/// recurrence with Akra–Bazzi.
pub(crate) fn solve_akra_bazzi(rec: &Recurrence) -> TheoremResult {
    let pairs = rec.term_pairs();
    let Some(p_star) = critical_exponent(&pairs) else {
        return TheoremResult::NotApplicable {
            reasons: vec![
                SolverError::non_convergence("critical-exponent solver", 200).to_string(),
            ],
        };
    };

    let var = rec.variable.clone();
    let work_class = classify(&rec.work);
    let clean_poly_log = matches!(
        work_class.form,
        GrowthForm::Constant
            | GrowthForm::Logarithmic
            | GrowthForm::Polynomial
            | GrowthForm::PolyLog
    ) && work_class.confidence >= 0.9;

    if clean_poly_log {
        let d = work_class.degree;
        let k = work_class.log_exponent;
        // ∫₁ⁿ u^(d−p−1)·log^k u du splits on the sign of d − p. The
        // k = −1 antiderivative is log log u, which has no poly-log
        // shape; that case falls through to the symbolic integral.
        let solution = if (d - p_star).abs() <= EXPONENT_EPS {
            // Integral grows another log factor: Θ(n^p · log^(k+1) n).
            (k > -1.0 + 1e-9).then(|| Expr::poly_log(p_star, k + 1.0, var.clone()))
        } else if d > p_star {
            // f dominates: the integral is Θ(n^(d−p) log^k n).
            Some(Expr::poly_log(d, k, var.clone()))
        } else {
            // The recursion tree dominates: the integral is O(1).
            Some(Expr::poly_log(p_star, 0.0, var.clone()))
        };
        if let Some(solution) = solution {
            return TheoremResult::AkraBazzi {
                solution,
                critical_exponent: p_star,
                closed_form: true,
            };
        }
    }

    // No closed form: return Θ(n^p · (1 + ∫₁ⁿ f(u)/u^(p+1) du)) with the
    // integral kept symbolic.
    let u = Variable::new("u", VarKind::Custom);
    let integrand = Expr::times(
        rec.work.substitute(&rec.variable, &Expr::var(u.clone())),
        Expr::power(Expr::var(u.clone()), -(p_star + 1.0)),
    );
    let integral = Expr::integral(integrand, u, 1.0, Expr::var(var.clone()));
    let solution = Expr::times(
        Expr::poly_log(p_star, 0.0, var),
        Expr::plus(Expr::constant(1.0), integral),
    );
    TheoremResult::AkraBazzi {
        solution,
        critical_exponent: p_star,
        closed_form: false,
    }
}
