//! Critical-exponent solver for the Akra–Bazzi sum equation.
//!
//! Solves `g(p) = Σ aᵢ·bᵢ^p − 1 = 0` for the unique real root. With
//! `aᵢ > 0` and `0 < bᵢ < 1`, `g` is strictly decreasing from `+∞` to
//! `−1`, so exactly one root exists.

/// Residual tolerance: stop when `|g(p)| < RESIDUAL_TOL`.
const RESIDUAL_TOL: f64 = 1e-9;
/// Step tolerance: stop when `|Δp| < STEP_TOL`.
const STEP_TOL: f64 = 1e-12;
/// Iteration cap for the Newton/bisection loop.
const MAX_ITERATIONS: usize = 200;

fn g(terms: &[(f64, f64)], p: f64) -> f64 {
    terms.iter().map(|&(a, b)| a * b.powf(p)).sum::<f64>() - 1.0
}

fn g_prime(terms: &[(f64, f64)], p: f64) -> f64 {
    terms.iter().map(|&(a, b)| a * b.powf(p) * b.ln()).sum()
}

/// Solve `Σ aᵢ·bᵢ^p = 1` for `p`.
///
/// Returns `None` for ill-formed input (`aᵢ ≤ 0`, `bᵢ ∉ (0, 1)`, empty
/// term list) or if the iteration cap is reached without convergence.
/// A returned root satisfies `|Σ aᵢ·bᵢ^p − 1| < 1e-6`.
#[must_use]
pub fn critical_exponent(terms: &[(f64, f64)]) -> Option<f64> {
    if terms.is_empty() {
        return None;
    }
    for &(a, b) in terms {
        if a <= 0.0 || b <= 0.0 || b >= 1.0 || !a.is_finite() || !b.is_finite() {
            return None;
        }
    }

    // Initial guess from the single-term closed form: if all scale factors
    // were min_b, the root would be log(Σa) / log(1/min_b).
    let total_a: f64 = terms.iter().map(|&(a, _)| a).sum();
    let min_b = terms
        .iter()
        .map(|&(_, b)| b)
        .fold(f64::INFINITY, f64::min);
    let mut p0 = total_a.ln() / (1.0 / min_b).ln();
    if !p0.is_finite() {
        p0 = 0.0;
    }

    // Bracket the root by doubling outward: g is decreasing, so we need
    // g(lo) > 0 > g(hi).
    let mut lo = p0;
    let mut hi = p0;
    let mut step = 1.0;
    for _ in 0..200 {
        if g(terms, lo) > 0.0 {
            break;
        }
        lo -= step;
        step *= 2.0;
    }
    step = 1.0;
    for _ in 0..200 {
        if g(terms, hi) < 0.0 {
            break;
        }
        hi += step;
        step *= 2.0;
    }
    if g(terms, lo) <= 0.0 || g(terms, hi) >= 0.0 {
        return None;
    }

    // Damped Newton with bisection fallback when a step leaves the
    // bracket or stalls.
    let mut p = 0.5 * (lo + hi);
    for _ in 0..MAX_ITERATIONS {
        let residual = g(terms, p);
        if residual.abs() < RESIDUAL_TOL {
            return Some(p);
        }
        // Maintain the bracket.
        if residual > 0.0 {
            lo = p;
        } else {
            hi = p;
        }

        let slope = g_prime(terms, p);
        let newton = if slope.abs() > f64::MIN_POSITIVE {
            p - residual / slope
        } else {
            f64::NAN
        };

        let next = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - p).abs() < STEP_TOL {
            let final_residual = g(terms, next);
            return (final_residual.abs() < 1e-6).then_some(next);
        }
        p = next;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_term_matches_log_ratio() {
        // 2·(1/2)^p = 1  =>  p = 1
        let p = critical_exponent(&[(2.0, 0.5)]).unwrap();
        assert!((p - 1.0).abs() < 1e-9);
        // 7·(1/2)^p = 1  =>  p = log2 7
        let p = critical_exponent(&[(7.0, 0.5)]).unwrap();
        assert!((p - 7.0_f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn two_term_akra_bazzi() {
        // (1/3)^p + (2/3)^p = 1  =>  p = 1
        let p = critical_exponent(&[(1.0, 1.0 / 3.0), (1.0, 2.0 / 3.0)]).unwrap();
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn residual_law_holds() {
        let terms = [(3.0, 0.25), (2.0, 0.5), (0.5, 0.75)];
        let p = critical_exponent(&terms).unwrap();
        let residual: f64 =
            terms.iter().map(|&(a, b)| a * b.powf(p)).sum::<f64>() - 1.0;
        assert!(residual.abs() < 1e-6);
    }

    #[test]
    fn negative_exponent_root() {
        // 0.5·(1/2)^p = 1  =>  p = -1
        let p = critical_exponent(&[(0.5, 0.5)]).unwrap();
        assert!((p + 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_ill_formed_input() {
        assert_eq!(critical_exponent(&[]), None);
        assert_eq!(critical_exponent(&[(0.0, 0.5)]), None);
        assert_eq!(critical_exponent(&[(-1.0, 0.5)]), None);
        assert_eq!(critical_exponent(&[(2.0, 1.0)]), None);
        assert_eq!(critical_exponent(&[(2.0, 1.5)]), None);
    }
}
