//! Characteristic-polynomial root finding.
//!
//! Roots of `x^k − c₁·x^(k−1) − ... − c_k = 0` drive the homogeneous
//! solution of a linear recurrence. The solver is a Durand–Kerner
//! iteration over the complex plane: it finds all roots simultaneously,
//! repeated and complex ones included, without forming a companion matrix.

use num_complex::Complex64;

/// Durand–Kerner convergence tolerance.
const ROOT_TOL: f64 = 1e-10;
/// Durand–Kerner sweep cap.
const MAX_SWEEPS: usize = 500;
/// Clustering radius for grouping repeated roots.
const CLUSTER_RADIUS: f64 = 1e-6;

/// Evaluate a monic polynomial with the given ascending coefficients
/// (`poly[i]` multiplies `x^i`, implicit leading 1 at degree `poly.len()`).
fn eval_monic(poly: &[f64], z: Complex64) -> Complex64 {
    let mut acc = Complex64::new(1.0, 0.0);
    for &coef in poly.iter().rev() {
        acc = acc * z + Complex64::new(coef, 0.0);
    }
    acc
}

/// All complex roots of the characteristic polynomial of a linear
/// recurrence with the given history coefficients `c₁ … c_k`.
///
/// The polynomial is `x^k − c₁·x^(k−1) − ... − c_k`. Returns `None` for
/// an empty (order-zero) recurrence or when the iteration does not
/// converge.
#[must_use]
pub fn characteristic_roots(coefficients: &[f64]) -> Option<Vec<Complex64>> {
    let order = coefficients
        .iter()
        .rposition(|c| c.abs() > 0.0)
        .map(|i| i + 1)?;

    // Ascending monic coefficients: x^k − Σ cᵢ x^(k−i).
    // Degree k−i carries −cᵢ, so ascending index j holds −c_{k−j}.
    let monic: Vec<f64> = (0..order).map(|j| -coefficients[order - 1 - j]).collect();
    durand_kerner(&monic)
}

/// Durand–Kerner simultaneous iteration on a monic polynomial given by
/// ascending non-leading coefficients.
fn durand_kerner(monic: &[f64]) -> Option<Vec<Complex64>> {
    let degree = monic.len();
    if degree == 0 {
        return Some(Vec::new());
    }
    if degree == 1 {
        return Some(vec![Complex64::new(-monic[0], 0.0)]);
    }

    // Cauchy bound keeps every root inside |z| <= 1 + max|c|.
    let radius = 1.0 + monic.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    let offset = Complex64::new(0.4, 0.9); // deliberately non-real start
    let mut roots: Vec<Complex64> = (0..degree)
        .map(|j| {
            #[allow(clippy::cast_precision_loss, reason = "degree is tiny")]
            let angle = 2.0 * std::f64::consts::PI * (j as f64) / (degree as f64);
            offset + Complex64::from_polar(radius, angle)
        })
        .collect();

    for _ in 0..MAX_SWEEPS {
        let mut worst_step = 0.0_f64;
        for j in 0..degree {
            let zj = roots[j];
            let mut denom = Complex64::new(1.0, 0.0);
            for (m, &zm) in roots.iter().enumerate() {
                if m != j {
                    denom *= zj - zm;
                }
            }
            if denom.norm() < f64::MIN_POSITIVE {
                // Two iterates collided; nudge and keep sweeping.
                roots[j] += Complex64::new(1e-6, 1e-6);
                worst_step = f64::INFINITY;
                continue;
            }
            let delta = eval_monic(monic, zj) / denom;
            roots[j] = zj - delta;
            worst_step = worst_step.max(delta.norm());
        }
        if worst_step < ROOT_TOL {
            return Some(roots);
        }
    }
    None
}

/// Group roots into `(representative, multiplicity)` clusters.
#[must_use]
pub fn group_roots(roots: &[Complex64]) -> Vec<(Complex64, usize)> {
    let mut clusters: Vec<(Complex64, usize)> = Vec::new();
    for &root in roots {
        if let Some((rep, count)) = clusters
            .iter_mut()
            .find(|(rep, _)| (*rep - root).norm() < CLUSTER_RADIUS)
        {
            // Running mean keeps the representative centered.
            #[allow(clippy::cast_precision_loss, reason = "multiplicities are tiny")]
            let k = *count as f64;
            *rep = (*rep * k + root) / (k + 1.0);
            *count += 1;
        } else {
            clusters.push((root, 1));
        }
    }
    clusters
}

/// The root of largest magnitude and its multiplicity.
#[must_use]
pub fn dominant_root(roots: &[Complex64]) -> Option<(Complex64, usize)> {
    let clusters = group_roots(roots);
    clusters
        .into_iter()
        .max_by(|(a, _), (b, _)| {
            a.norm()
                .partial_cmp(&b.norm())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real_parts(roots: &[Complex64]) -> Vec<f64> {
        let mut parts: Vec<f64> = roots.iter().map(|r| r.re).collect();
        parts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        parts
    }

    #[test]
    fn fibonacci_characteristic_roots() {
        // x^2 - x - 1: roots phi and -1/phi
        let roots = characteristic_roots(&[1.0, 1.0]).unwrap();
        let parts = sorted_real_parts(&roots);
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        assert!((parts[1] - phi).abs() < 1e-8);
        assert!((parts[0] + 1.0 / phi).abs() < 1e-8);
    }

    #[test]
    fn repeated_root_is_clustered() {
        // T(n) = 2T(n-1) - T(n-2): (x-1)^2
        let roots = characteristic_roots(&[2.0, -1.0]).unwrap();
        let clusters = group_roots(&roots);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].1, 2);
        assert!((clusters[0].0.re - 1.0).abs() < 1e-5);
    }

    #[test]
    fn complex_roots_come_in_pairs() {
        // x^2 + 1: roots ±i
        let roots = characteristic_roots(&[0.0, -1.0]).unwrap();
        assert_eq!(roots.len(), 2);
        for root in &roots {
            assert!(root.re.abs() < 1e-8);
            assert!((root.im.abs() - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn dominant_root_of_tribonacci() {
        let roots = characteristic_roots(&[1.0, 1.0, 1.0]).unwrap();
        let (root, multiplicity) = dominant_root(&roots).unwrap();
        assert_eq!(multiplicity, 1);
        // Tribonacci constant
        assert!((root.norm() - 1.839_286_755_214_161).abs() < 1e-6);
    }

    #[test]
    fn empty_recurrence_has_no_roots() {
        assert_eq!(characteristic_roots(&[]), None);
        assert_eq!(characteristic_roots(&[0.0, 0.0]), None);
    }
}
