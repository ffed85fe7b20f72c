//! Canonical Big-O rendering.
//!
//! `Display` produces deterministic text for any expression; [`Expr::big_o`]
//! wraps it in `O(...)`. Numbers render as integers when they are integers
//! and with at most three decimals otherwise, so `log₂ 3 = 1.584...`
//! renders as `1.585` on every platform.

use std::fmt;

use super::expr::{BinaryOp, Expr, ParallelPattern, SpecialKind};

/// Format a scalar deterministically: integers without a decimal point,
/// everything else rounded to three decimals with trailing zeros trimmed.
pub(crate) fn fmt_num(x: f64) -> String {
    if !x.is_finite() {
        return "?".to_owned();
    }
    if (x - x.round()).abs() < 1e-9 {
        // Round-trips exactly for every integral f64 we ever print.
        return format!("{}", x.round());
    }
    let rendered = format!("{x:.3}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

/// Name of a log factor: `log(x)` in base 2, `log_b(x)` otherwise.
fn log_name(base: f64) -> String {
    if (base - 2.0).abs() < 1e-9 {
        "log".to_owned()
    } else {
        format!("log_{}", fmt_num(base))
    }
}

const fn pattern_name(pattern: ParallelPattern) -> &'static str {
    match pattern {
        ParallelPattern::MapReduce => "map-reduce",
        ParallelPattern::ForkJoin => "fork-join",
        ParallelPattern::Pipeline => "pipeline",
        ParallelPattern::DivideAndConquer => "divide-and-conquer",
        ParallelPattern::DataParallel => "data-parallel",
    }
}

/// Wrap a multiplication operand in parentheses when precedence needs it.
fn mul_operand(e: &Expr) -> String {
    match e {
        Expr::Binary {
            op: BinaryOp::Plus, ..
        }
        | Expr::Conditional { .. } => format!("({e})"),
        _ => format!("{e}"),
    }
}

/// Render the poly-log factors `v^degree · log^log_exp(v)`.
fn poly_log_body(degree: f64, log_exp: f64, var: &str, base: f64) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(2);
    if degree.abs() >= 1e-12 {
        if (degree - 1.0).abs() < 1e-12 {
            parts.push(var.to_owned());
        } else {
            parts.push(format!("{var}^{}", fmt_num(degree)));
        }
    }
    if log_exp.abs() >= 1e-12 {
        if (log_exp - 1.0).abs() < 1e-12 {
            parts.push(format!("{}({var})", log_name(base)));
        } else {
            parts.push(format!("{}^{}({var})", log_name(base), fmt_num(log_exp)));
        }
    }
    if parts.is_empty() {
        "1".to_owned()
    } else {
        parts.join(" * ")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{}", fmt_num(*c)),
            Self::Var(v) => write!(f, "{}", v.name()),
            Self::Linear { coef, var } => {
                if (coef - 1.0).abs() < 1e-12 {
                    write!(f, "{}", var.name())
                } else {
                    write!(f, "{}*{}", fmt_num(*coef), var.name())
                }
            }
            Self::Poly { coeffs, var } => {
                let mut terms: Vec<String> = Vec::with_capacity(coeffs.len());
                for (&degree, &coef) in coeffs.iter().rev() {
                    if coef == 0.0 {
                        continue;
                    }
                    let body = match degree {
                        0 => fmt_num(coef),
                        1 if (coef - 1.0).abs() < 1e-12 => var.name().to_owned(),
                        1 => format!("{}*{}", fmt_num(coef), var.name()),
                        _ if (coef - 1.0).abs() < 1e-12 => {
                            format!("{}^{degree}", var.name())
                        }
                        _ => format!("{}*{}^{degree}", fmt_num(coef), var.name()),
                    };
                    terms.push(body);
                }
                if terms.is_empty() {
                    write!(f, "0")
                } else {
                    write!(f, "{}", terms.join(" + "))
                }
            }
            Self::Log { coef, var, base } => {
                if (coef - 1.0).abs() < 1e-12 {
                    write!(f, "{}({})", log_name(*base), var.name())
                } else {
                    write!(f, "{}*{}({})", fmt_num(*coef), log_name(*base), var.name())
                }
            }
            Self::Exp { coef, base, var } => {
                if (coef - 1.0).abs() < 1e-12 {
                    write!(f, "{}^{}", fmt_num(*base), var.name())
                } else {
                    write!(f, "{}*{}^{}", fmt_num(*coef), fmt_num(*base), var.name())
                }
            }
            Self::Factorial { coef, var } => {
                if (coef - 1.0).abs() < 1e-12 {
                    write!(f, "{}!", var.name())
                } else {
                    write!(f, "{}*{}!", fmt_num(*coef), var.name())
                }
            }
            Self::PolyLog {
                coef,
                degree,
                log_exp,
                var,
                base,
            } => {
                let body = poly_log_body(*degree, *log_exp, var.name(), *base);
                if (coef - 1.0).abs() < 1e-12 {
                    write!(f, "{body}")
                } else {
                    write!(f, "{}*{body}", fmt_num(*coef))
                }
            }
            Self::Power { inner, exponent } => {
                write!(f, "({inner})^{}", fmt_num(*exponent))
            }
            Self::LogOf { inner, base } => write!(f, "{}({inner})", log_name(*base)),
            Self::ExpOf { base, inner } => write!(f, "{}^({inner})", fmt_num(*base)),
            Self::FactorialOf { inner } => write!(f, "({inner})!"),
            Self::Binary { op, left, right } => match op {
                BinaryOp::Plus => write!(f, "{left} + {right}"),
                BinaryOp::Multiply => {
                    write!(f, "{} * {}", mul_operand(left), mul_operand(right))
                }
                BinaryOp::Max => write!(f, "max({left}, {right})"),
                BinaryOp::Min => write!(f, "min({left}, {right})"),
            },
            // Branches render as their conservative upper bound.
            Self::Conditional {
                when_true,
                when_false,
                ..
            } => write!(f, "max({when_true}, {when_false})"),
            Self::Parallel(par) => write!(
                f,
                "par[{}](work = {}, span = {})",
                pattern_name(par.pattern),
                par.work,
                par.span
            ),
            Self::Probabilistic(prob) => write!(f, "E[{}]", prob.expected),
            Self::Recurrence(rec) => write!(f, "T({})", rec.variable.name()),
            Self::Integral {
                integrand,
                var,
                lower,
                upper,
                bound,
            } => match bound {
                Some(b) => write!(f, "{b}"),
                None => write!(
                    f,
                    "int_{}^{}({integrand}) d{}",
                    fmt_num(*lower),
                    upper,
                    var.name()
                ),
            },
            Self::Special { kind, arg } => match kind {
                SpecialKind::Polylog { order } => {
                    write!(f, "Li_{}({arg})", fmt_num(*order))
                }
                SpecialKind::IncompleteGamma { shape } => {
                    write!(f, "igamma({}, {arg})", fmt_num(*shape))
                }
                SpecialKind::IncompleteBeta { a, b } => {
                    write!(f, "ibeta({}, {}, {arg})", fmt_num(*a), fmt_num(*b))
                }
                SpecialKind::Hypergeometric { a, b, c } => write!(
                    f,
                    "2F1({}, {}; {}; {arg})",
                    fmt_num(*a),
                    fmt_num(*b),
                    fmt_num(*c)
                ),
            },
        }
    }
}

impl Expr {
    /// Canonical Big-O text for this expression.
    #[must_use]
    pub fn big_o(&self) -> String {
        format!("O({self})")
    }
}
