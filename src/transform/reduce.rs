//! Big-O normalization: constant-factor and lower-order-term dropping.

use std::sync::Arc;

use super::classify::{GrowthForm, classify};
use crate::core::expr::{BinaryOp, Expr};

/// Drop every constant factor, normalizing leading coefficients to 1.
///
/// `O(5)` becomes `O(1)`, `O(3n)` becomes `O(n)`, `O(2n · log n)` becomes
/// `O(n log n)`. The zero constant survives: it marks absent cost.
#[must_use]
#[allow(clippy::too_many_lines, reason = "one arm per expression variant")]
pub fn drop_constant_factors(expr: &Expr) -> Expr {
    match expr {
        Expr::Const(c) => {
            if *c == 0.0 {
                Expr::constant(0.0)
            } else {
                Expr::constant(1.0)
            }
        }
        Expr::Var(_) => expr.clone(),
        Expr::Linear { var, .. } => Expr::var(var.clone()),
        Expr::Poly { coeffs, var } => {
            let degree = coeffs
                .iter()
                .filter(|(_, c)| c.abs() > 0.0)
                .map(|(d, _)| *d)
                .max();
            match degree {
                None => Expr::constant(0.0),
                Some(d) => {
                    let leading = coeffs.get(&d).copied().unwrap_or(1.0);
                    let scaled = coeffs
                        .iter()
                        .map(|(deg, coef)| (*deg, coef / leading))
                        .collect::<Vec<_>>();
                    Expr::poly(scaled, var.clone())
                }
            }
        }
        Expr::Log { var, base, .. } => Expr::log_base(1.0, var.clone(), *base),
        Expr::Exp { base, var, .. } => Expr::exp(*base, var.clone()),
        Expr::Factorial { var, .. } => Expr::factorial(var.clone()),
        Expr::PolyLog {
            degree,
            log_exp,
            var,
            base,
            ..
        } => Expr::poly_log_full(1.0, *degree, *log_exp, var.clone(), *base),
        Expr::Power { inner, exponent } => Expr::power(drop_constant_factors(inner), *exponent),
        Expr::LogOf { inner, base } => Expr::log_of(drop_constant_factors(inner), *base),
        Expr::ExpOf { base, inner } => Expr::exp_of(*base, drop_constant_factors(inner)),
        Expr::FactorialOf { inner } => Expr::factorial_of(drop_constant_factors(inner)),
        Expr::Binary { op, left, right } => {
            let l = drop_constant_factors(left);
            let r = drop_constant_factors(right);
            if *op == BinaryOp::Multiply {
                // A constant operand is now exactly 1; drop it.
                if l.is_one() {
                    return r;
                }
                if r.is_one() {
                    return l;
                }
            }
            Expr::binary(*op, l, r)
        }
        Expr::Conditional {
            description,
            when_true,
            when_false,
        } => Expr::conditional(
            description,
            drop_constant_factors(when_true),
            drop_constant_factors(when_false),
        ),
        Expr::Parallel(par) => {
            let mut out = par.clone();
            out.work = Arc::new(drop_constant_factors(&par.work));
            out.span = Arc::new(drop_constant_factors(&par.span));
            Expr::Parallel(out)
        }
        Expr::Probabilistic(prob) => {
            let mut out = prob.clone();
            out.expected = Arc::new(drop_constant_factors(&prob.expected));
            out.worst = Arc::new(drop_constant_factors(&prob.worst));
            Expr::Probabilistic(out)
        }
        Expr::Recurrence(_) | Expr::Special { .. } => expr.clone(),
        Expr::Integral {
            integrand,
            var,
            lower,
            upper,
            bound,
        } => {
            let mut out = Expr::integral(
                integrand.as_ref().clone(),
                var.clone(),
                *lower,
                upper.as_ref().clone(),
            );
            if let (Expr::Integral { bound: slot, .. }, Some(b)) = (&mut out, bound) {
                *slot = Some(Arc::new(drop_constant_factors(b)));
            }
            out
        }
    }
}

/// Keep only the asymptotically dominant operand of every `Plus`.
///
/// Sums over different variables (`O(V + E)`) are irreducible and kept;
/// so are sums involving unclassifiable terms, which must not be dropped.
#[must_use]
pub fn drop_lower_order_terms(expr: &Expr) -> Expr {
    match expr {
        Expr::Binary {
            op: BinaryOp::Plus,
            left,
            right,
        } => {
            let l = drop_lower_order_terms(left);
            let r = drop_lower_order_terms(right);
            let lc = classify(&l);
            let rc = classify(&r);
            if lc.form == GrowthForm::Unknown || rc.form == GrowthForm::Unknown {
                return Expr::plus(l, r);
            }
            let incomparable = match (&lc.primary, &rc.primary) {
                (Some(lv), Some(rv)) => lv != rv,
                _ => false,
            };
            if incomparable {
                return Expr::plus(l, r);
            }
            match lc.cmp_asymptotic(&rc) {
                std::cmp::Ordering::Less => r,
                std::cmp::Ordering::Equal | std::cmp::Ordering::Greater => l,
            }
        }
        Expr::Binary { op, left, right } => Expr::binary(
            *op,
            drop_lower_order_terms(left),
            drop_lower_order_terms(right),
        ),
        Expr::Power { inner, exponent } => Expr::power(drop_lower_order_terms(inner), *exponent),
        Expr::Conditional {
            description,
            when_true,
            when_false,
        } => Expr::conditional(
            description,
            drop_lower_order_terms(when_true),
            drop_lower_order_terms(when_false),
        ),
        Expr::Poly { coeffs, var } => {
            // A polynomial is a sum; keep its top degree only.
            let degree = coeffs
                .iter()
                .filter(|(_, c)| c.abs() > 0.0)
                .map(|(d, _)| *d)
                .max();
            match degree {
                None => Expr::constant(0.0),
                Some(0) => Expr::constant(coeffs.get(&0).copied().unwrap_or(0.0)),
                Some(d) => Expr::poly_log_full(
                    coeffs.get(&d).copied().unwrap_or(1.0),
                    f64::from(d),
                    0.0,
                    var.clone(),
                    2.0,
                ),
            }
        }
        _ => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;

    fn n() -> Variable {
        Variable::n()
    }

    #[test]
    fn constants_normalize_to_one() {
        assert_eq!(drop_constant_factors(&Expr::constant(42.0)), Expr::constant(1.0));
        assert_eq!(drop_constant_factors(&Expr::constant(0.0)), Expr::constant(0.0));
    }

    #[test]
    fn linear_coefficient_dropped() {
        assert_eq!(
            drop_constant_factors(&Expr::linear(7.0, n())),
            Expr::var(n())
        );
    }

    #[test]
    fn lower_order_terms_dropped() {
        // n^2 + n -> n^2
        let e = Expr::plus(Expr::poly_log(2.0, 0.0, n()), Expr::var(n()));
        assert_eq!(
            drop_lower_order_terms(&e),
            Expr::poly_log(2.0, 0.0, n())
        );
    }

    #[test]
    fn cross_variable_sums_survive() {
        // V + E stays V + E
        let e = Expr::plus(
            Expr::var(Variable::v()),
            Expr::var(Variable::e()),
        );
        assert_eq!(drop_lower_order_terms(&e), e);
    }

    #[test]
    fn polynomial_keeps_top_degree() {
        let e = Expr::poly([(2, 3.0), (1, 9.0), (0, 5.0)], n());
        let dropped = drop_lower_order_terms(&e);
        assert_eq!(dropped, Expr::poly_log_full(3.0, 2.0, 0.0, n(), 2.0));
    }
}
