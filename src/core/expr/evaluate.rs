//! Numeric evaluation of expressions under a variable binding.
//!
//! Evaluation is total in the sense that it never fails loudly: an unbound
//! variable or a domain violation (log of a non-positive value, a
//! non-finite intermediate) yields `None`. Conditionals evaluate
//! conservatively to the max of their branches; probabilistic costs
//! evaluate to their expected form; unsolved recurrences have no value.

use std::collections::HashMap;

use super::{BinaryOp, Expr, SpecialKind};
use crate::numeric::simpson::adaptive_simpson;
use crate::numeric::special::{
    hypergeometric_2f1, incomplete_beta, lower_incomplete_gamma, polylog,
};

/// Factorial of a (possibly fractional) non-negative value.
///
/// Exact product for small integers, Stirling's approximation beyond.
fn factorial_value(x: f64) -> Option<f64> {
    if x < 0.0 {
        return None;
    }
    if x.fract() == 0.0 && x <= 20.0 {
        let mut acc = 1.0_f64;
        let mut i = 2.0_f64;
        while i <= x {
            acc *= i;
            i += 1.0;
        }
        return Some(acc);
    }
    // Stirling: x! ≈ √(2πx) (x/e)^x, with the 1/(12x) correction.
    let stirling = (2.0 * std::f64::consts::PI * x).sqrt()
        * (x / std::f64::consts::E).powf(x)
        * (1.0 + 1.0 / (12.0 * x));
    stirling.is_finite().then_some(stirling)
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

fn log_in_base(x: f64, base: f64) -> Option<f64> {
    if x <= 0.0 || base <= 0.0 || (base - 1.0).abs() < f64::EPSILON {
        return None;
    }
    finite(x.ln() / base.ln())
}

impl Expr {
    /// Evaluate under `binding` (variable name → value).
    ///
    /// Returns `None` when any needed variable is unbound or a domain
    /// precondition fails.
    #[must_use]
    pub fn evaluate(&self, binding: &HashMap<&str, f64>) -> Option<f64> {
        match self {
            Self::Const(c) => finite(*c),
            Self::Var(v) => binding.get(v.name()).copied(),
            Self::Linear { coef, var } => {
                let v = binding.get(var.name()).copied()?;
                finite(coef * v)
            }
            Self::Poly { coeffs, var } => {
                let v = binding.get(var.name()).copied()?;
                let mut acc = 0.0;
                for (&degree, &coef) in coeffs {
                    acc += coef * v.powi(i32::try_from(degree).ok()?);
                }
                finite(acc)
            }
            Self::Log { coef, var, base } => {
                let v = binding.get(var.name()).copied()?;
                Some(coef * log_in_base(v, *base)?)
            }
            Self::Exp { coef, base, var } => {
                let v = binding.get(var.name()).copied()?;
                finite(coef * base.powf(v))
            }
            Self::Factorial { coef, var } => {
                let v = binding.get(var.name()).copied()?;
                finite(coef * factorial_value(v)?)
            }
            Self::PolyLog {
                coef,
                degree,
                log_exp,
                var,
                base,
            } => {
                let v = binding.get(var.name()).copied()?;
                if v <= 0.0 {
                    return None;
                }
                let poly_part = v.powf(*degree);
                let log_part = if log_exp.abs() < 1e-12 {
                    1.0
                } else {
                    log_in_base(v, *base)?.powf(*log_exp)
                };
                finite(coef * poly_part * log_part)
            }
            Self::Power { inner, exponent } => {
                let v = inner.evaluate(binding)?;
                finite(v.powf(*exponent))
            }
            Self::LogOf { inner, base } => {
                let v = inner.evaluate(binding)?;
                log_in_base(v, *base)
            }
            Self::ExpOf { base, inner } => {
                let v = inner.evaluate(binding)?;
                finite(base.powf(v))
            }
            Self::FactorialOf { inner } => {
                let v = inner.evaluate(binding)?;
                factorial_value(v)
            }
            Self::Binary { op, left, right } => {
                let l = left.evaluate(binding)?;
                let r = right.evaluate(binding)?;
                let value = match op {
                    BinaryOp::Plus => l + r,
                    BinaryOp::Multiply => l * r,
                    BinaryOp::Max => l.max(r),
                    BinaryOp::Min => l.min(r),
                };
                finite(value)
            }
            Self::Conditional {
                when_true,
                when_false,
                ..
            } => {
                // Conservative: whichever branch is taken, the cost is at
                // most the max of both.
                let t = when_true.evaluate(binding)?;
                let f = when_false.evaluate(binding)?;
                Some(t.max(f))
            }
            Self::Parallel(par) => match &par.processors {
                Some(p) => {
                    let work = par.work.evaluate(binding)?;
                    let span = par.span.evaluate(binding)?;
                    let procs = binding.get(p.name()).copied()?;
                    if procs <= 0.0 {
                        return None;
                    }
                    finite((work / procs).max(span))
                }
                // No schedule: sequential execution of the total work.
                None => par.work.evaluate(binding),
            },
            Self::Probabilistic(prob) => prob.expected.evaluate(binding),
            Self::Recurrence(_) => None,
            Self::Integral {
                integrand,
                var,
                lower,
                upper,
                bound,
            } => {
                if let Some(b) = bound {
                    return b.evaluate(binding);
                }
                let hi = upper.evaluate(binding)?;
                if hi <= *lower {
                    return Some(0.0);
                }
                let f = |u: f64| {
                    let mut inner: HashMap<&str, f64> = HashMap::new();
                    inner.extend(binding.iter().map(|(name, value)| (*name, *value)));
                    inner.insert(var.name(), u);
                    integrand.evaluate(&inner)
                };
                let quad = adaptive_simpson(&f, *lower, hi, 1e-8)?;
                finite(quad.value)
            }
            Self::Special { kind, arg } => {
                let x = arg.evaluate(binding)?;
                match kind {
                    SpecialKind::Polylog { order } => polylog(*order, x),
                    SpecialKind::IncompleteGamma { shape } => lower_incomplete_gamma(*shape, x),
                    SpecialKind::IncompleteBeta { a, b } => incomplete_beta(*a, *b, x),
                    SpecialKind::Hypergeometric { a, b, c } => hypergeometric_2f1(*a, *b, *c, x),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variable::Variable;

    fn bind(n: f64) -> HashMap<&'static str, f64> {
        let mut map = HashMap::new();
        map.insert("n", n);
        map
    }

    #[test]
    fn unbound_variable_yields_none() {
        let e = Expr::var(Variable::m());
        assert_eq!(e.evaluate(&bind(4.0)), None);
    }

    #[test]
    fn log_of_non_positive_yields_none() {
        let e = Expr::log(1.0, Variable::n());
        assert_eq!(e.evaluate(&bind(0.0)), None);
        assert_eq!(e.evaluate(&bind(-3.0)), None);
    }

    #[test]
    fn polylog_form_evaluates() {
        // n * log2(n) at n = 8 is 24.
        let e = Expr::poly_log(1.0, 1.0, Variable::n());
        let value = e.evaluate(&bind(8.0)).unwrap();
        assert!((value - 24.0).abs() < 1e-9);
    }

    #[test]
    fn conditional_is_conservative() {
        let n = Variable::n();
        let e = Expr::conditional(
            "found early",
            Expr::constant(1.0),
            Expr::linear(1.0, n),
        );
        assert_eq!(e.evaluate(&bind(100.0)), Some(100.0));
    }

    #[test]
    fn factorial_small_and_large() {
        let e = Expr::factorial(Variable::n());
        assert_eq!(e.evaluate(&bind(5.0)), Some(120.0));
        // Stirling for 25! should be within 0.5% of the exact value.
        let exact_25 = 1.551_121_004_333_098_6e25;
        let approx = e.evaluate(&bind(25.0)).unwrap();
        assert!((approx - exact_25).abs() / exact_25 < 5e-3);
    }

    #[test]
    fn binary_operators() {
        let n = Variable::n();
        let max = Expr::max_of(Expr::linear(1.0, n.clone()), Expr::constant(10.0));
        assert_eq!(max.evaluate(&bind(3.0)), Some(10.0));
        let min = Expr::min_of(Expr::linear(1.0, n), Expr::constant(10.0));
        assert_eq!(min.evaluate(&bind(3.0)), Some(3.0));
    }
}
