//! Dominant-form classification and the asymptotic comparator.
//!
//! [`classify`] reduces any expression to `(form, degree, log exponent,
//! leading coefficient, confidence)`. The comparator orders expressions by
//! the standard growth hierarchy:
//!
//! `Constant < Log < Linear < PolyLog < Polynomial(degree) <
//! Exponential(base) < Factorial`
//!
//! with unknowns conservatively placed above everything (an unclassifiable
//! term must not be dropped as a lower-order term).

use std::cmp::Ordering;

use crate::core::expr::{BinaryOp, Expr};
use crate::core::variable::Variable;

/// Epsilon for comparing exponents and degrees.
const DEGREE_EPS: f64 = 1e-9;

/// The coarse growth family of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthForm {
    /// `O(1)`.
    Constant,
    /// `O(log^k n)`.
    Logarithmic,
    /// `O(n^d)`.
    Polynomial,
    /// `O(n^d · log^k n)` with both factors present.
    PolyLog,
    /// `O(b^n)`.
    Exponential,
    /// `O(n!)`.
    Factorial,
    /// Could not be classified.
    Unknown,
}

/// Result of classifying an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The growth family.
    pub form: GrowthForm,
    /// The variable growth is measured against, when there is one.
    pub primary: Option<Variable>,
    /// Polynomial degree (0 for constants and pure logs).
    pub degree: f64,
    /// Logarithm exponent.
    pub log_exponent: f64,
    /// Exponential base (1 when the form is not exponential).
    pub base: f64,
    /// Leading coefficient.
    pub leading_coef: f64,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Classification {
    fn constant(value: f64) -> Self {
        Self {
            form: GrowthForm::Constant,
            primary: None,
            degree: 0.0,
            log_exponent: 0.0,
            base: 1.0,
            leading_coef: value,
            confidence: 1.0,
        }
    }

    fn unknown(confidence: f64) -> Self {
        Self {
            form: GrowthForm::Unknown,
            primary: None,
            degree: 0.0,
            log_exponent: 0.0,
            base: 1.0,
            leading_coef: 1.0,
            confidence,
        }
    }

    fn poly_like(primary: Variable, degree: f64, log_exponent: f64, coef: f64) -> Self {
        let form = if degree.abs() < DEGREE_EPS && log_exponent.abs() < DEGREE_EPS {
            GrowthForm::Constant
        } else if degree.abs() < DEGREE_EPS {
            GrowthForm::Logarithmic
        } else if log_exponent.abs() < DEGREE_EPS {
            GrowthForm::Polynomial
        } else {
            GrowthForm::PolyLog
        };
        Self {
            form,
            primary: Some(primary),
            degree,
            log_exponent,
            base: 1.0,
            leading_coef: coef,
            confidence: 1.0,
        }
    }

    /// Tier in the growth hierarchy, for lexicographic ordering.
    const fn tier(&self) -> u8 {
        match self.form {
            GrowthForm::Constant | GrowthForm::Logarithmic | GrowthForm::Polynomial
            | GrowthForm::PolyLog => 1,
            GrowthForm::Exponential => 2,
            GrowthForm::Factorial => 3,
            // Conservatively high: never dropped as a lower-order term.
            GrowthForm::Unknown => 4,
        }
    }

    /// Compare two classifications asymptotically. Ties on growth break
    /// by leading coefficient.
    #[must_use]
    pub fn cmp_asymptotic(&self, other: &Self) -> Ordering {
        let tiers = self.tier().cmp(&other.tier());
        if tiers != Ordering::Equal {
            return tiers;
        }
        // Exponential forms order by base first, then by any polynomial
        // prefactor (n·2^n dominates 2^n).
        let key = |c: &Self| match c.form {
            GrowthForm::Exponential => (c.base, c.degree),
            _ => (c.degree, c.log_exponent),
        };
        let (a1, b1) = key(self);
        let (a2, b2) = key(other);
        if (a1 - a2).abs() > DEGREE_EPS {
            return a1.partial_cmp(&a2).unwrap_or(Ordering::Equal);
        }
        if (b1 - b2).abs() > DEGREE_EPS {
            return b1.partial_cmp(&b2).unwrap_or(Ordering::Equal);
        }
        if (self.leading_coef - other.leading_coef).abs() > DEGREE_EPS {
            return self
                .leading_coef
                .partial_cmp(&other.leading_coef)
                .unwrap_or(Ordering::Equal);
        }
        Ordering::Equal
    }

    /// Expected `S(2n)/S(n)` ratio for poly-like forms at the given `n`.
    ///
    /// Returns `None` for exponential, factorial, and unknown growth, where
    /// the ratio is unbounded or undefined.
    #[must_use]
    pub fn growth_ratio(&self, n: f64) -> Option<f64> {
        match self.form {
            GrowthForm::Constant => Some(1.0),
            GrowthForm::Logarithmic | GrowthForm::Polynomial | GrowthForm::PolyLog => {
                if n <= 1.0 {
                    return None;
                }
                let poly = 2.0_f64.powf(self.degree);
                let logs = ((2.0 * n).log2() / n.log2()).powf(self.log_exponent);
                Some(poly * logs)
            }
            GrowthForm::Exponential | GrowthForm::Factorial | GrowthForm::Unknown => None,
        }
    }
}

/// Classify an expression into its dominant growth form.
#[must_use]
#[allow(clippy::too_many_lines, reason = "one arm per expression variant")]
pub fn classify(expr: &Expr) -> Classification {
    match expr {
        Expr::Const(c) => Classification::constant(*c),
        Expr::Var(v) => Classification::poly_like(v.clone(), 1.0, 0.0, 1.0),
        Expr::Linear { coef, var } => Classification::poly_like(var.clone(), 1.0, 0.0, *coef),
        Expr::Poly { coeffs, var } => {
            let degree = coeffs
                .iter()
                .filter(|(_, c)| c.abs() > 0.0)
                .map(|(d, _)| *d)
                .max()
                .unwrap_or(0);
            let coef = coeffs.get(&degree).copied().unwrap_or(0.0);
            if degree == 0 {
                Classification::constant(coef)
            } else {
                Classification::poly_like(var.clone(), f64::from(degree), 0.0, coef)
            }
        }
        Expr::Log { coef, var, .. } => Classification::poly_like(var.clone(), 0.0, 1.0, *coef),
        Expr::Exp { coef, base, var } => Classification {
            form: GrowthForm::Exponential,
            primary: Some(var.clone()),
            degree: 0.0,
            log_exponent: 0.0,
            base: *base,
            leading_coef: *coef,
            confidence: 1.0,
        },
        Expr::Factorial { coef, var } => Classification {
            form: GrowthForm::Factorial,
            primary: Some(var.clone()),
            degree: 0.0,
            log_exponent: 0.0,
            base: 1.0,
            leading_coef: *coef,
            confidence: 1.0,
        },
        Expr::PolyLog {
            coef,
            degree,
            log_exp,
            var,
            ..
        } => Classification::poly_like(var.clone(), *degree, *log_exp, *coef),
        Expr::Power { inner, exponent } => {
            let mut inner_class = classify(inner);
            match inner_class.form {
                GrowthForm::Constant => {
                    Classification::constant(inner_class.leading_coef.powf(*exponent))
                }
                GrowthForm::Logarithmic | GrowthForm::Polynomial | GrowthForm::PolyLog => {
                    let primary = inner_class.primary.clone();
                    Classification {
                        confidence: inner_class.confidence,
                        ..Classification::poly_like(
                            primary.unwrap_or_else(Variable::n),
                            inner_class.degree * exponent,
                            inner_class.log_exponent * exponent,
                            inner_class.leading_coef.powf(*exponent),
                        )
                    }
                }
                GrowthForm::Exponential => {
                    // (b^n)^p = (b^p)^n
                    inner_class.base = inner_class.base.powf(*exponent);
                    inner_class.leading_coef = inner_class.leading_coef.powf(*exponent);
                    inner_class.confidence *= 0.95;
                    inner_class
                }
                GrowthForm::Factorial | GrowthForm::Unknown => {
                    inner_class.confidence *= 0.8;
                    inner_class
                }
            }
        }
        Expr::LogOf { inner, .. } => {
            let inner_class = classify(inner);
            match inner_class.form {
                GrowthForm::Constant => Classification::constant(1.0),
                // log(n^d log^e n) ~ d·log n
                GrowthForm::Logarithmic | GrowthForm::Polynomial | GrowthForm::PolyLog => {
                    let coef = if inner_class.degree.abs() < DEGREE_EPS {
                        1.0
                    } else {
                        inner_class.degree
                    };
                    Classification {
                        confidence: inner_class.confidence * 0.95,
                        ..Classification::poly_like(
                            inner_class.primary.unwrap_or_else(Variable::n),
                            0.0,
                            1.0,
                            coef,
                        )
                    }
                }
                // log(b^n) ~ n·ln b
                GrowthForm::Exponential => Classification {
                    confidence: inner_class.confidence * 0.95,
                    ..Classification::poly_like(
                        inner_class.primary.unwrap_or_else(Variable::n),
                        1.0,
                        0.0,
                        inner_class.base.ln(),
                    )
                },
                // log(n!) ~ n·log n by Stirling
                GrowthForm::Factorial => Classification {
                    confidence: inner_class.confidence * 0.9,
                    ..Classification::poly_like(
                        inner_class.primary.unwrap_or_else(Variable::n),
                        1.0,
                        1.0,
                        1.0,
                    )
                },
                GrowthForm::Unknown => Classification::unknown(inner_class.confidence * 0.5),
            }
        }
        Expr::ExpOf { base, inner } => {
            let inner_class = classify(inner);
            match inner_class.form {
                GrowthForm::Constant => {
                    Classification::constant(base.powf(inner_class.leading_coef))
                }
                // b^(c·log2 n) = n^(c·log2 b)
                GrowthForm::Logarithmic => Classification {
                    confidence: inner_class.confidence * 0.9,
                    ..Classification::poly_like(
                        inner_class.primary.unwrap_or_else(Variable::n),
                        inner_class.leading_coef * base.log2(),
                        0.0,
                        1.0,
                    )
                },
                // b^(c·n) = (b^c)^n
                GrowthForm::Polynomial if (inner_class.degree - 1.0).abs() < DEGREE_EPS => {
                    Classification {
                        form: GrowthForm::Exponential,
                        primary: inner_class.primary,
                        degree: 0.0,
                        log_exponent: 0.0,
                        base: base.powf(inner_class.leading_coef),
                        leading_coef: 1.0,
                        confidence: inner_class.confidence,
                    }
                }
                // b^(n^2) and worse: superexponential, keep unknown-high.
                _ => Classification::unknown(inner_class.confidence * 0.5),
            }
        }
        Expr::FactorialOf { inner } => {
            let inner_class = classify(inner);
            if matches!(
                inner_class.form,
                GrowthForm::Polynomial | GrowthForm::Constant
            ) && (inner_class.degree - 1.0).abs() < DEGREE_EPS
            {
                Classification {
                    form: GrowthForm::Factorial,
                    primary: inner_class.primary,
                    degree: 0.0,
                    log_exponent: 0.0,
                    base: 1.0,
                    leading_coef: 1.0,
                    confidence: inner_class.confidence,
                }
            } else {
                Classification::unknown(inner_class.confidence * 0.5)
            }
        }
        Expr::Binary { op, left, right } => {
            let l = classify(left);
            let r = classify(right);
            match op {
                // Sums and maxima are dominated by the larger operand.
                BinaryOp::Plus | BinaryOp::Max => dominant(l, r),
                BinaryOp::Min => {
                    let keep_left = l.cmp_asymptotic(&r) != Ordering::Greater;
                    if keep_left { l } else { r }
                }
                BinaryOp::Multiply => product(l, r),
            }
        }
        Expr::Conditional {
            when_true,
            when_false,
            ..
        } => {
            let mut out = dominant(classify(when_true), classify(when_false));
            out.confidence *= 0.9;
            out
        }
        // Sequential execution of the total work is the conservative bound.
        Expr::Parallel(par) => classify(&par.work),
        Expr::Probabilistic(prob) => {
            let mut out = classify(&prob.expected);
            out.confidence *= 0.9;
            out
        }
        Expr::Recurrence(_) => Classification::unknown(0.3),
        Expr::Integral { bound, .. } => bound
            .as_ref()
            .map_or_else(|| Classification::unknown(0.4), |b| classify(b)),
        Expr::Special { .. } => Classification::unknown(0.5),
    }
}

/// Classify against a specific variable: growth in any other variable is
/// treated as constant for the caller's purposes, with a confidence
/// penalty when the expression's own dominant variable differs.
#[must_use]
pub fn classify_with(expr: &Expr, var: &Variable) -> Classification {
    let mut out = classify(expr);
    if let Some(primary) = &out.primary
        && primary != var
    {
        out.confidence *= 0.7;
    }
    out
}

/// Dominant form of a sum/max: the asymptotically larger side; when the
/// two sides grow over different variables the sum is kept as polynomial
/// evidence over the left's variable with reduced confidence.
fn dominant(l: Classification, r: Classification) -> Classification {
    if let (Some(lv), Some(rv)) = (&l.primary, &r.primary)
        && lv != rv
        && l.tier() == r.tier()
    {
        // O(V + E)-style sums are irreducible; report the left side but
        // admit uncertainty about dominance.
        let mut out = l;
        out.confidence *= 0.8;
        return out;
    }
    match l.cmp_asymptotic(&r) {
        Ordering::Less => r,
        Ordering::Equal | Ordering::Greater => l,
    }
}

/// Classification of a product: degrees add, log exponents add,
/// exponential bases multiply, factorial wins over everything known.
fn product(l: Classification, r: Classification) -> Classification {
    use GrowthForm as G;
    let confidence = l.confidence.min(r.confidence);
    let coef = l.leading_coef * r.leading_coef;
    let primary = l.primary.clone().or_else(|| r.primary.clone());

    let merged = match (l.form, r.form) {
        (G::Unknown, _) | (_, G::Unknown) => Classification::unknown(confidence * 0.8),
        (G::Factorial, _) | (_, G::Factorial) => Classification {
            form: G::Factorial,
            primary,
            degree: 0.0,
            log_exponent: 0.0,
            base: 1.0,
            leading_coef: coef,
            confidence,
        },
        (G::Exponential, G::Exponential) => Classification {
            form: G::Exponential,
            primary,
            degree: 0.0,
            log_exponent: 0.0,
            base: l.base * r.base,
            leading_coef: coef,
            confidence,
        },
        (G::Exponential, _) | (_, G::Exponential) => {
            // Polynomial prefactors do not change the exponential family.
            let base = if l.form == G::Exponential { l.base } else { r.base };
            Classification {
                form: G::Exponential,
                primary,
                degree: l.degree + r.degree,
                log_exponent: l.log_exponent + r.log_exponent,
                base,
                leading_coef: coef,
                confidence,
            }
        }
        _ => Classification {
            confidence,
            ..Classification::poly_like(
                primary.unwrap_or_else(Variable::n),
                l.degree + r.degree,
                l.log_exponent + r.log_exponent,
                coef,
            )
        },
    };
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_polylog_product() {
        let n = Variable::n();
        // n * log n as an explicit product.
        let e = Expr::times(Expr::var(n.clone()), Expr::log(1.0, n));
        let c = classify(&e);
        assert_eq!(c.form, GrowthForm::PolyLog);
        assert!((c.degree - 1.0).abs() < 1e-9);
        assert!((c.log_exponent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sum_is_dominated_by_larger_term() {
        let n = Variable::n();
        let e = Expr::plus(
            Expr::poly_log(2.0, 0.0, n.clone()),
            Expr::linear(50.0, n),
        );
        let c = classify(&e);
        assert_eq!(c.form, GrowthForm::Polynomial);
        assert!((c.degree - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ordering_follows_the_hierarchy() {
        let n = Variable::n();
        let ladder = [
            Expr::constant(5.0),
            Expr::log(1.0, n.clone()),
            Expr::var(n.clone()),
            Expr::poly_log(1.0, 1.0, n.clone()),
            Expr::poly_log(2.0, 0.0, n.clone()),
            Expr::exp(2.0, n.clone()),
            Expr::factorial(n.clone()),
        ];
        for pair in ladder.windows(2) {
            let lower = classify(&pair[0]);
            let upper = classify(&pair[1]);
            assert_eq!(
                lower.cmp_asymptotic(&upper),
                Ordering::Less,
                "expected {} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn exp_of_log_is_polynomial() {
        let n = Variable::n();
        // 2^(3·log2 n) = n^3
        let e = Expr::exp_of(2.0, Expr::log(3.0, n));
        let c = classify(&e);
        assert_eq!(c.form, GrowthForm::Polynomial);
        assert!((c.degree - 3.0).abs() < 1e-9);
    }

    #[test]
    fn log_of_factorial_is_n_log_n() {
        let n = Variable::n();
        let e = Expr::log_of(Expr::factorial(n), 2.0);
        let c = classify(&e);
        assert_eq!(c.form, GrowthForm::PolyLog);
        assert!((c.degree - 1.0).abs() < 1e-9);
        assert!((c.log_exponent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn growth_ratio_of_quadratic() {
        let n = Variable::n();
        let c = classify(&Expr::poly_log(2.0, 0.0, n));
        let ratio = c.growth_ratio(100.0).unwrap();
        assert!((ratio - 4.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_classifies_by_its_work() {
        use crate::core::expr::{ParallelCost, ParallelPattern};
        let n = Variable::n();
        let cost = ParallelCost {
            work: Expr::poly_log(1.0, 1.0, n.clone()).into(),
            span: Expr::log(1.0, n.clone()).into(),
            processors: Some(Variable::p()),
            pattern: ParallelPattern::DivideAndConquer,
            task_based: false,
            sync_overhead: None,
            description: None,
        };
        let c = classify(&Expr::parallel(cost));
        assert_eq!(c.form, GrowthForm::PolyLog);
        assert!((c.degree - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probabilistic_classifies_expected_with_penalty() {
        use crate::core::expr::ProbabilisticCost;
        let n = Variable::n();
        let cost = ProbabilisticCost {
            expected: Expr::poly_log(1.0, 1.0, n.clone()).into(),
            worst: Expr::poly_log(2.0, 0.0, n.clone()).into(),
            best: None,
            randomness: "pivot choice".to_owned(),
            distribution: "uniform".to_owned(),
            variance: None,
            high_probability: None,
            assumptions: vec!["independent pivots".to_owned()],
            description: None,
        };
        let c = classify(&Expr::probabilistic(cost));
        assert_eq!(c.form, GrowthForm::PolyLog);
        assert!(c.confidence < 1.0);
    }

    #[test]
    fn unknown_is_placed_high() {
        let n = Variable::n();
        let unknown = Classification::unknown(0.3);
        let factorial = classify(&Expr::factorial(n));
        assert_eq!(factorial.cmp_asymptotic(&unknown), Ordering::Less);
    }
}
