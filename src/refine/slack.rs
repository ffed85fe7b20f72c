//! Slack-constant optimizer.
//!
//! Fits the scalar `c` in `T(n) ≈ c·S(n)` by least squares against
//! simulated samples of the recurrence, preserving the asymptotic shape
//! while tightening the leading coefficient. The fit quality (`R²`)
//! feeds the confidence scorer.

use std::collections::HashMap;

use crate::core::expr::Expr;
use crate::numeric::{simulate_divide_and_conquer, simulate_linear};
use crate::recurrence::Recurrence;

/// A fitted leading constant and its goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlackFit {
    /// Least-squares `c` in `T(n) ≈ c·S(n)`.
    pub constant: f64,
    /// Coefficient of determination of the fit, in `(−∞, 1]`.
    pub r_squared: f64,
}

/// Sample grid shared with the induction verifier.
fn sample_grid() -> Vec<f64> {
    (4..16).map(|k| f64::from(1u32 << k)).collect()
}

/// Fit `c` minimizing `Σ (T(nᵢ) − c·S(nᵢ))²` over the sample grid.
///
/// Returns `None` when the recurrence cannot be simulated or the shape
/// cannot be evaluated.
#[must_use]
pub fn fit_constant(rec: &Recurrence, shape: &Expr) -> Option<SlackFit> {
    let var = rec.variable.name();
    let mut pairs: Vec<(f64, f64)> = Vec::new();

    for n in sample_grid() {
        let mut binding = HashMap::new();
        binding.insert(var, n);
        let s = shape.evaluate(&binding)?;
        let t = if rec.is_subtractive() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "grid points are small")]
            let steps = n as usize;
            simulate_linear(&rec.as_linear()?, steps)?
        } else {
            simulate_divide_and_conquer(rec, n)?
        };
        if !(s.is_finite() && t.is_finite()) || s <= 0.0 {
            return None;
        }
        pairs.push((s, t));
    }

    let ss: f64 = pairs.iter().map(|(s, _)| s * s).sum();
    let st: f64 = pairs.iter().map(|(s, t)| s * t).sum();
    if ss <= 0.0 {
        return None;
    }
    let constant = st / ss;
    if !(constant.is_finite() && constant > 0.0) {
        return None;
    }

    #[allow(clippy::cast_precision_loss, reason = "sample counts are tiny")]
    let mean_t: f64 = pairs.iter().map(|(_, t)| t).sum::<f64>() / pairs.len() as f64;
    let ss_res: f64 = pairs
        .iter()
        .map(|(s, t)| {
            let r = t - constant * s;
            r * r
        })
        .sum();
    let ss_tot: f64 = pairs
        .iter()
        .map(|(_, t)| {
            let d = t - mean_t;
            d * d
        })
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    Some(SlackFit {
        constant,
        r_squared,
    })
}
