//! Fixed-point rewrite engine.
//!
//! Rules are applied bottom-up over the tree; the outer loop repeats until
//! nothing changes, a cycle is detected, or the iteration cap is hit. The
//! rule set is the contract table: identity elimination, constant folding,
//! like-term combination, exponent combining, and canonicalization of
//! degenerate poly-log shapes.

use rustc_hash::FxHashSet;
use std::sync::Arc;

use crate::core::expr::{BinaryOp, Expr};
use crate::core::variable::Variable;
use crate::recurrence::Recurrence;

/// Iteration cap for the fixed-point loop. Each pass strictly shrinks or
/// canonicalizes, so real expressions converge in a handful of passes.
const MAX_ITERATIONS: usize = 100;

/// Check if rewrite tracing is enabled via environment variable.
fn trace_enabled() -> bool {
    std::env::var("ASYMPTOTICA_TRACE").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// A structured leaf seen through the unified `coef · v^deg · log^le(v)` lens.
#[derive(Debug, Clone)]
struct PolyLogView {
    coef: f64,
    degree: f64,
    log_exp: f64,
    var: Variable,
    base: f64,
}

impl PolyLogView {
    /// Whether two views may be merged multiplicatively: same variable,
    /// and log bases agree whenever both carry a log factor.
    fn compatible(&self, other: &Self) -> bool {
        if self.var != other.var {
            return false;
        }
        if self.log_exp.abs() > 1e-12 && other.log_exp.abs() > 1e-12 {
            return (self.base - other.base).abs() < 1e-12;
        }
        true
    }

    /// The effective log base after a merge.
    fn merged_base(&self, other: &Self) -> f64 {
        if self.log_exp.abs() > 1e-12 {
            self.base
        } else {
            other.base
        }
    }
}

/// View an expression through the poly-log lens, when it has that shape.
fn as_poly_log(e: &Expr) -> Option<PolyLogView> {
    match e {
        Expr::Var(v) => Some(PolyLogView {
            coef: 1.0,
            degree: 1.0,
            log_exp: 0.0,
            var: v.clone(),
            base: 2.0,
        }),
        Expr::Linear { coef, var } => Some(PolyLogView {
            coef: *coef,
            degree: 1.0,
            log_exp: 0.0,
            var: var.clone(),
            base: 2.0,
        }),
        Expr::Log { coef, var, base } => Some(PolyLogView {
            coef: *coef,
            degree: 0.0,
            log_exp: 1.0,
            var: var.clone(),
            base: *base,
        }),
        Expr::PolyLog {
            coef,
            degree,
            log_exp,
            var,
            base,
        } => Some(PolyLogView {
            coef: *coef,
            degree: *degree,
            log_exp: *log_exp,
            var: var.clone(),
            base: *base,
        }),
        Expr::Poly { coeffs, var } => {
            // Only single-term polynomials have a poly-log shape.
            let mut nonzero = coeffs.iter().filter(|(_, c)| c.abs() > 0.0);
            let (&degree, &coef) = nonzero.next()?;
            if nonzero.next().is_some() {
                return None;
            }
            Some(PolyLogView {
                coef,
                degree: f64::from(degree),
                log_exp: 0.0,
                var: var.clone(),
                base: 2.0,
            })
        }
        Expr::Power { inner, exponent } => {
            let view = as_poly_log(inner)?;
            let coef = view.coef.powf(*exponent);
            if !coef.is_finite() {
                return None;
            }
            Some(PolyLogView {
                coef,
                degree: view.degree * exponent,
                log_exp: view.log_exp * exponent,
                var: view.var,
                base: view.base,
            })
        }
        _ => None,
    }
}

/// Rebuild the simplest expression for a poly-log view.
fn canonical(view: PolyLogView) -> Expr {
    let PolyLogView {
        coef,
        degree,
        log_exp,
        var,
        base,
    } = view;
    if coef == 0.0 {
        return Expr::constant(0.0);
    }
    let no_poly = degree.abs() < 1e-12;
    let no_log = log_exp.abs() < 1e-12;
    if no_poly && no_log {
        return Expr::constant(coef);
    }
    if no_log && (degree - 1.0).abs() < 1e-12 {
        return Expr::linear(coef, var);
    }
    if no_poly && (log_exp - 1.0).abs() < 1e-12 {
        return Expr::log_base(coef, var, base);
    }
    Expr::poly_log_full(coef, degree, log_exp, var, base)
}

/// Simplify an expression by applying rules until a fixed point.
#[must_use]
pub fn simplify(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let trace = trace_enabled();

    for pass in 0..MAX_ITERATIONS {
        // Cycle detection on the canonical rendering.
        if !seen.insert(format!("{current}")) {
            break;
        }

        let next = apply_rules(&current);
        if next == current {
            break;
        }
        if trace {
            eprintln!("[asymptotica] pass {pass}: {current} => {next}");
        }
        current = next;
    }

    current
}

/// One bottom-up pass: simplify children first, then the node itself.
fn apply_rules(expr: &Expr) -> Expr {
    let rebuilt = match expr {
        Expr::Power { inner, exponent } => Expr::power(apply_rules(inner), *exponent),
        Expr::LogOf { inner, base } => Expr::log_of(apply_rules(inner), *base),
        Expr::ExpOf { base, inner } => Expr::exp_of(*base, apply_rules(inner)),
        Expr::FactorialOf { inner } => Expr::factorial_of(apply_rules(inner)),
        Expr::Binary { op, left, right } => {
            Expr::binary(*op, apply_rules(left), apply_rules(right))
        }
        Expr::Conditional {
            description,
            when_true,
            when_false,
        } => Expr::conditional(description, apply_rules(when_true), apply_rules(when_false)),
        Expr::Parallel(par) => {
            let mut out = par.clone();
            out.work = Arc::new(apply_rules(&par.work));
            out.span = Arc::new(apply_rules(&par.span));
            if let Some(sync) = &par.sync_overhead {
                out.sync_overhead = Some(Arc::new(apply_rules(sync)));
            }
            Expr::Parallel(out)
        }
        Expr::Probabilistic(prob) => {
            let mut out = prob.clone();
            out.expected = Arc::new(apply_rules(&prob.expected));
            out.worst = Arc::new(apply_rules(&prob.worst));
            if let Some(best) = &prob.best {
                out.best = Some(Arc::new(apply_rules(best)));
            }
            Expr::Probabilistic(out)
        }
        Expr::Recurrence(rec) => {
            let inner = Recurrence::new(
                rec.terms.clone(),
                rec.variable.clone(),
                apply_rules(&rec.work),
            )
            .with_base_case(rec.base_case);
            Expr::recurrence(inner)
        }
        Expr::Integral {
            integrand,
            var,
            lower,
            upper,
            bound,
        } => {
            let mut out = Expr::integral(
                apply_rules(integrand),
                var.clone(),
                *lower,
                apply_rules(upper),
            );
            if let (Expr::Integral { bound: slot, .. }, Some(b)) = (&mut out, bound) {
                *slot = Some(Arc::new(apply_rules(b)));
            }
            out
        }
        Expr::Special { kind, arg } => Expr::special(*kind, apply_rules(arg)),
        leaf => leaf.clone(),
    };

    apply_node_rules(rebuilt)
}

/// Rules for a single node whose children are already simplified.
#[allow(clippy::too_many_lines, reason = "the rewrite table is one flat match")]
fn apply_node_rules(expr: Expr) -> Expr {
    match &expr {
        Expr::Binary { op, left, right } => match op {
            BinaryOp::Plus => {
                // 0 + x = x, x + 0 = x
                if left.is_zero() {
                    return right.as_ref().clone();
                }
                if right.is_zero() {
                    return left.as_ref().clone();
                }
                // c1 + c2 folds
                if let (Some(a), Some(b)) = (left.as_const(), right.as_const()) {
                    let folded = a + b;
                    if folded.is_finite() {
                        return Expr::constant(folded);
                    }
                }
                // k·v + m·v = (k+m)·v and like poly-log terms combine
                if let (Some(l), Some(r)) = (as_poly_log(left), as_poly_log(right))
                    && l.var == r.var
                    && (l.degree - r.degree).abs() < 1e-12
                    && (l.log_exp - r.log_exp).abs() < 1e-12
                    && (l.log_exp.abs() < 1e-12 || (l.base - r.base).abs() < 1e-12)
                {
                    let coef = l.coef + r.coef;
                    return canonical(PolyLogView { coef, ..l });
                }
                expr
            }
            BinaryOp::Multiply => {
                // 0 · x = 0, x · 0 = 0
                if left.is_zero() || right.is_zero() {
                    return Expr::constant(0.0);
                }
                // 1 · x = x, x · 1 = x
                if left.is_one() {
                    return right.as_ref().clone();
                }
                if right.is_one() {
                    return left.as_ref().clone();
                }
                // c1 · c2 folds
                if let (Some(a), Some(b)) = (left.as_const(), right.as_const()) {
                    let folded = a * b;
                    if folded.is_finite() {
                        return Expr::constant(folded);
                    }
                }
                // c · (k·v) = (c·k)·v and friends
                if let Some(c) = left.as_const()
                    && let Some(view) = as_poly_log(right)
                {
                    return canonical(PolyLogView {
                        coef: c * view.coef,
                        ..view
                    });
                }
                if let Some(c) = right.as_const()
                    && let Some(view) = as_poly_log(left)
                {
                    return canonical(PolyLogView {
                        coef: c * view.coef,
                        ..view
                    });
                }
                // Constant scaling of the remaining structured leaves.
                if let Some(c) = left.as_const()
                    && let Some(scaled) = scale_leaf(right, c)
                {
                    return scaled;
                }
                if let Some(c) = right.as_const()
                    && let Some(scaled) = scale_leaf(left, c)
                {
                    return scaled;
                }
                // v · v = v², v · v^k = v^(k+1), n·log n fusion
                if let (Some(l), Some(r)) = (as_poly_log(left), as_poly_log(right))
                    && l.compatible(&r)
                {
                    let base = l.merged_base(&r);
                    return canonical(PolyLogView {
                        coef: l.coef * r.coef,
                        degree: l.degree + r.degree,
                        log_exp: l.log_exp + r.log_exp,
                        var: l.var,
                        base,
                    });
                }
                // b1^v · b2^v = (b1·b2)^v
                if let (
                    Expr::Exp {
                        coef: c1,
                        base: b1,
                        var: v1,
                    },
                    Expr::Exp {
                        coef: c2,
                        base: b2,
                        var: v2,
                    },
                ) = (left.as_ref(), right.as_ref())
                    && v1 == v2
                {
                    return Expr::Exp {
                        coef: c1 * c2,
                        base: b1 * b2,
                        var: v1.clone(),
                    };
                }
                expr
            }
            BinaryOp::Max => {
                // max(x, x) = x
                if left == right {
                    return left.as_ref().clone();
                }
                // max(0, x) = x: complexities are non-negative
                if left.is_zero() {
                    return right.as_ref().clone();
                }
                if right.is_zero() {
                    return left.as_ref().clone();
                }
                if let (Some(a), Some(b)) = (left.as_const(), right.as_const()) {
                    return Expr::constant(a.max(b));
                }
                if let (Some(l), Some(r)) = (as_poly_log(left), as_poly_log(right))
                    && l.var == r.var
                    && (l.log_exp.abs() < 1e-12 || r.log_exp.abs() < 1e-12
                        || (l.base - r.base).abs() < 1e-12)
                {
                    let keep_left = (l.degree, l.log_exp, l.coef) >= (r.degree, r.log_exp, r.coef);
                    return if keep_left {
                        left.as_ref().clone()
                    } else {
                        right.as_ref().clone()
                    };
                }
                expr
            }
            BinaryOp::Min => {
                // min(x, x) = x
                if left == right {
                    return left.as_ref().clone();
                }
                if let (Some(a), Some(b)) = (left.as_const(), right.as_const()) {
                    return Expr::constant(a.min(b));
                }
                if let (Some(l), Some(r)) = (as_poly_log(left), as_poly_log(right))
                    && l.var == r.var
                    && (l.log_exp.abs() < 1e-12 || r.log_exp.abs() < 1e-12
                        || (l.base - r.base).abs() < 1e-12)
                {
                    let keep_left = (l.degree, l.log_exp, l.coef) <= (r.degree, r.log_exp, r.coef);
                    return if keep_left {
                        left.as_ref().clone()
                    } else {
                        right.as_ref().clone()
                    };
                }
                expr
            }
        },
        Expr::Power { inner, exponent } => {
            // x^0 = 1
            if exponent.abs() < 1e-12 {
                return Expr::constant(1.0);
            }
            // x^1 = x
            if (exponent - 1.0).abs() < 1e-12 {
                return inner.as_ref().clone();
            }
            // c^k folds
            if let Some(c) = inner.as_const() {
                let folded = c.powf(*exponent);
                if folded.is_finite() {
                    return Expr::constant(folded);
                }
            }
            // (x^a)^b = x^(a·b)
            if let Expr::Power {
                inner: deeper,
                exponent: inner_exp,
            } = inner.as_ref()
            {
                return Expr::Power {
                    inner: Arc::clone(deeper),
                    exponent: inner_exp * exponent,
                };
            }
            // Structured leaves absorb the exponent.
            if let Some(view) = as_poly_log(inner) {
                let coef = view.coef.powf(*exponent);
                if coef.is_finite() {
                    return canonical(PolyLogView {
                        coef,
                        degree: view.degree * exponent,
                        log_exp: view.log_exp * exponent,
                        var: view.var,
                        base: view.base,
                    });
                }
            }
            expr
        }
        Expr::LogOf { inner, base } => {
            if let Some(c) = inner.as_const()
                && c > 0.0
                && *base > 0.0
            {
                let folded = c.ln() / base.ln();
                if folded.is_finite() {
                    return Expr::constant(folded);
                }
            }
            // log(v) collapses to the structured log leaf.
            if let Expr::Var(v) = inner.as_ref() {
                return Expr::log_base(1.0, v.clone(), *base);
            }
            expr
        }
        Expr::ExpOf { base, inner } => {
            if let Some(c) = inner.as_const() {
                let folded = base.powf(c);
                if folded.is_finite() {
                    return Expr::constant(folded);
                }
            }
            // b^v collapses to the structured exp leaf.
            if let Expr::Var(v) = inner.as_ref() {
                return Expr::exp(*base, v.clone());
            }
            expr
        }
        Expr::FactorialOf { inner } => {
            if let Expr::Var(v) = inner.as_ref() {
                return Expr::factorial(v.clone());
            }
            expr
        }
        Expr::Conditional {
            when_true,
            when_false,
            ..
        } => {
            if when_true == when_false {
                return when_true.as_ref().clone();
            }
            expr
        }
        Expr::Poly { coeffs, .. } => {
            // Degenerate polynomials collapse to their structured form.
            if let Some(view) = as_poly_log(&expr) {
                return canonical(view);
            }
            let nonzero = coeffs.iter().filter(|(_, c)| c.abs() > 0.0).count();
            if nonzero == 0 {
                return Expr::constant(0.0);
            }
            expr
        }
        // Degenerate poly-logs collapse to Const/Linear/Log leaves.
        Expr::PolyLog { .. } => {
            if let Some(view) = as_poly_log(&expr) {
                let collapsed = canonical(view);
                if collapsed != expr {
                    return collapsed;
                }
            }
            expr
        }
        _ => expr,
    }
}

/// Scale the coefficient of a non-poly-log structured leaf by a constant.
fn scale_leaf(e: &Expr, c: f64) -> Option<Expr> {
    match e {
        Expr::Exp { coef, base, var } => Some(Expr::Exp {
            coef: coef * c,
            base: *base,
            var: var.clone(),
        }),
        Expr::Factorial { coef, var } => Some(Expr::Factorial {
            coef: coef * c,
            var: var.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n() -> Variable {
        Variable::n()
    }

    #[test]
    fn additive_identities() {
        let e = Expr::plus(Expr::constant(0.0), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::var(n()));
        let e = Expr::plus(Expr::var(n()), Expr::constant(0.0));
        assert_eq!(simplify(&e), Expr::var(n()));
    }

    #[test]
    fn constant_folding() {
        let e = Expr::plus(Expr::constant(2.0), Expr::constant(3.0));
        assert_eq!(simplify(&e), Expr::constant(5.0));
        let e = Expr::times(Expr::constant(2.0), Expr::constant(3.0));
        assert_eq!(simplify(&e), Expr::constant(6.0));
    }

    #[test]
    fn like_terms_combine() {
        // 2n + 3n = 5n
        let e = Expr::plus(Expr::linear(2.0, n()), Expr::linear(3.0, n()));
        assert_eq!(simplify(&e), Expr::linear(5.0, n()));
    }

    #[test]
    fn multiplicative_identities() {
        let e = Expr::times(Expr::constant(1.0), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::var(n()));
        let e = Expr::times(Expr::constant(0.0), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::constant(0.0));
    }

    #[test]
    fn constant_through_linear() {
        // 3 · (2n) = 6n
        let e = Expr::times(Expr::constant(3.0), Expr::linear(2.0, n()));
        assert_eq!(simplify(&e), Expr::linear(6.0, n()));
    }

    #[test]
    fn variable_squares() {
        // v · v = v^2
        let e = Expr::times(Expr::var(n()), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::poly_log(2.0, 0.0, n()));
        // v · v^2 = v^3
        let e = Expr::times(Expr::var(n()), Expr::poly_log(2.0, 0.0, n()));
        assert_eq!(simplify(&e), Expr::poly_log(3.0, 0.0, n()));
    }

    #[test]
    fn n_log_n_fuses() {
        let e = Expr::times(Expr::var(n()), Expr::log(1.0, n()));
        assert_eq!(simplify(&e), Expr::poly_log(1.0, 1.0, n()));
    }

    #[test]
    fn max_and_min_of_equal_operands() {
        let e = Expr::max_of(Expr::var(n()), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::var(n()));
        let e = Expr::min_of(Expr::log(1.0, n()), Expr::log(1.0, n()));
        assert_eq!(simplify(&e), Expr::log(1.0, n()));
    }

    #[test]
    fn max_of_zero_is_identity() {
        let e = Expr::max_of(Expr::constant(0.0), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::var(n()));
    }

    #[test]
    fn power_rules() {
        let e = Expr::power(Expr::var(n()), 0.0);
        assert_eq!(simplify(&e), Expr::constant(1.0));
        let e = Expr::power(Expr::var(n()), 1.0);
        assert_eq!(simplify(&e), Expr::var(n()));
        let e = Expr::power(Expr::constant(2.0), 10.0);
        assert_eq!(simplify(&e), Expr::constant(1024.0));
    }

    #[test]
    fn nested_powers_combine() {
        let e = Expr::power(Expr::power(Expr::var(n()), 2.0), 3.0);
        assert_eq!(simplify(&e), Expr::poly_log(6.0, 0.0, n()));
    }

    #[test]
    fn idempotence() {
        let e = Expr::plus(
            Expr::times(Expr::constant(2.0), Expr::var(n())),
            Expr::plus(Expr::linear(3.0, n()), Expr::constant(0.0)),
        );
        let once = simplify(&e);
        let twice = simplify(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn max_keeps_dominant_polylog() {
        let e = Expr::max_of(Expr::poly_log(2.0, 0.0, n()), Expr::var(n()));
        assert_eq!(simplify(&e), Expr::poly_log(2.0, 0.0, n()));
    }
}
