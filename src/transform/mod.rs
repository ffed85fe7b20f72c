//! Transformer: simplification, normalization, classification, comparison.
//!
//! [`normalize`] is the canonical Big-O pipeline: simplify to a fixed
//! point, drop constant factors, drop lower-order terms, then clean up.
//! Two expressions denote the same Big-O class exactly when their
//! normalized forms are structurally equal.

pub(crate) mod classify;
pub(crate) mod reduce;
pub(crate) mod simplify;

use std::cmp::Ordering;

use crate::core::expr::Expr;

pub use classify::{Classification, GrowthForm, classify, classify_with};
pub use reduce::{drop_constant_factors, drop_lower_order_terms};
pub use simplify::simplify;

/// Normalize to canonical Big-O form.
#[must_use]
pub fn normalize(expr: &Expr) -> Expr {
    let simplified = simplify(expr);
    let without_constants = drop_constant_factors(&simplified);
    let dominant = drop_lower_order_terms(&without_constants);
    // A second pass folds artifacts the droppers may have exposed.
    simplify(&dominant)
}

/// Compare two expressions asymptotically. Ties on growth rate break by
/// leading coefficient; `Equal` means same Big-O class and coefficient.
#[must_use]
pub fn compare(a: &Expr, b: &Expr) -> Ordering {
    classify(&simplify(a)).cmp_asymptotic(&classify(&simplify(b)))
}

/// Whether `a` grows strictly faster than `b`.
#[must_use]
pub fn dominates(a: &Expr, b: &Expr) -> bool {
    compare(a, b) == Ordering::Greater
}

/// Whether `a` grows strictly slower than `b`.
#[must_use]
pub fn is_dominated_by(a: &Expr, b: &Expr) -> bool {
    compare(a, b) == Ordering::Less
}

/// Whether two expressions normalize to the same Big-O form.
#[must_use]
pub fn are_equivalent(a: &Expr, b: &Expr) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;

    #[test]
    fn normalize_collapses_to_canonical_form() {
        let n = Variable::n();
        // 3n + 2n·log n + 7 -> n log n
        let e = Expr::plus(
            Expr::linear(3.0, n.clone()),
            Expr::plus(
                Expr::poly_log_full(2.0, 1.0, 1.0, n.clone(), 2.0),
                Expr::constant(7.0),
            ),
        );
        assert_eq!(normalize(&e), Expr::poly_log(1.0, 1.0, n));
    }

    #[test]
    fn equivalence_ignores_constants() {
        let n = Variable::n();
        assert!(are_equivalent(
            &Expr::linear(5.0, n.clone()),
            &Expr::var(n.clone())
        ));
        assert!(!are_equivalent(
            &Expr::var(n.clone()),
            &Expr::poly_log(2.0, 0.0, n)
        ));
    }

    #[test]
    fn dominance_is_antisymmetric() {
        let n = Variable::n();
        let quadratic = Expr::poly_log(2.0, 0.0, n.clone());
        let linear = Expr::var(n);
        assert!(dominates(&quadratic, &linear));
        assert!(is_dominated_by(&linear, &quadratic));
        assert!(!dominates(&linear, &quadratic));
    }
}
