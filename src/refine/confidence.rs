//! Confidence scoring.
//!
//! Combines provenance authority, expression simplicity, verification
//! outcome, numerical fit, and theorem fit into one score in `[0, 1]`,
//! mapped onto four coarse levels. A consensus of independent estimates
//! with small spread earns a boost.

use crate::core::expr::{Expr, SpecialKind};
use crate::core::source::SourceType;
use crate::core::variable::Variable;
use crate::core::visitor::{ExprVisitor, walk_expr};
use crate::recurrence::Recurrence;

/// Coarse confidence buckets for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLevel {
    /// Score below 0.4.
    Low,
    /// Score in `[0.4, 0.65)`.
    Medium,
    /// Score in `[0.65, 0.85)`.
    High,
    /// Score of 0.85 and above.
    VeryHigh,
}

impl ConfidenceLevel {
    fn from_score(score: f64) -> Self {
        if score < 0.4 {
            Self::Low
        } else if score < 0.65 {
            Self::Medium
        } else if score < 0.85 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

/// Everything the scorer weighs besides the expression itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceContext {
    /// Provenance of the estimate.
    pub source: SourceType,
    /// Outcome of induction verification, when it ran.
    pub verification: Option<bool>,
    /// `R²` of the slack fit, when it ran.
    pub fit_r_squared: Option<f64>,
    /// The theorem fired close to a case boundary.
    pub near_case_boundary: bool,
    /// The surface marked part of the procedure as unmodeled.
    pub incomplete: bool,
}

impl Default for ConfidenceContext {
    fn default() -> Self {
        Self {
            source: SourceType::Inferred,
            verification: None,
            fit_r_squared: None,
            near_case_boundary: false,
            incomplete: false,
        }
    }
}

/// A scored confidence with the factors that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceAssessment {
    /// Combined score in `[0, 1]`.
    pub score: f64,
    /// Coarse bucket of the score.
    pub level: ConfidenceLevel,
    /// `(factor name, multiplier)` pairs, for explanations.
    pub factors: Vec<(String, f64)>,
}

/// Counts the unresolved symbolic forms that penalize simplicity.
#[derive(Default)]
struct SymbolicCounter {
    nodes: usize,
    unresolved: usize,
}

impl ExprVisitor for SymbolicCounter {
    fn visit_const(&mut self, _value: f64) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_var(&mut self, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_linear(&mut self, _coef: f64, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_poly(&mut self, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_log(&mut self, _coef: f64, _var: &Variable, _base: f64) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_exp(&mut self, _coef: f64, _base: f64, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_factorial(&mut self, _coef: f64, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_poly_log(&mut self, _degree: f64, _log_exp: f64, _var: &Variable) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_binary(
        &mut self,
        _op: crate::core::expr::BinaryOp,
        _left: &Expr,
        _right: &Expr,
    ) -> bool {
        self.nodes += 1;
        true
    }
    fn visit_recurrence(&mut self, _rec: &Recurrence) -> bool {
        self.nodes += 1;
        self.unresolved += 1;
        true
    }
    fn visit_integral(&mut self, _integrand: &Expr, _var: &Variable, _upper: &Expr) -> bool {
        self.nodes += 1;
        self.unresolved += 1;
        true
    }
    fn visit_special(&mut self, _kind: SpecialKind, _arg: &Expr) -> bool {
        self.nodes += 1;
        self.unresolved += 1;
        true
    }
}

/// Score an expression's trustworthiness in its context.
#[must_use]
pub fn score_confidence(expr: &Expr, context: &ConfidenceContext) -> ConfidenceAssessment {
    let mut factors: Vec<(String, f64)> = Vec::new();
    let mut score = context.source.authority();
    factors.push(("source authority".to_owned(), score));

    // Simplicity: unresolved symbolic forms cost the most, bulk costs a
    // little.
    let mut counter = SymbolicCounter::default();
    walk_expr(expr, &mut counter);
    let simplicity = if counter.unresolved > 0 {
        0.6
    } else if counter.nodes > 16 {
        0.85
    } else {
        1.0
    };
    score *= simplicity;
    factors.push(("expression simplicity".to_owned(), simplicity));

    if let Some(verified) = context.verification {
        let factor = if verified { 1.15 } else { 0.6 };
        score *= factor;
        factors.push(("verification".to_owned(), factor));
    }

    if let Some(r2) = context.fit_r_squared {
        // R² below ~0.9 drags the score down quickly.
        let factor = r2.clamp(0.0, 1.0).powi(2).max(0.25);
        score *= factor;
        factors.push(("numerical fit".to_owned(), factor));
    }

    if context.near_case_boundary {
        score *= 0.85;
        factors.push(("theorem fit".to_owned(), 0.85));
    }

    if context.incomplete {
        score *= 0.7;
        factors.push(("incomplete model".to_owned(), 0.7));
    }

    let score = score.clamp(0.0, 1.0);
    ConfidenceAssessment {
        score,
        level: ConfidenceLevel::from_score(score),
        factors,
    }
}

/// Boost a score when independent estimates agree.
///
/// `estimates` are comparable scalar summaries (degrees, exponents) of
/// independent analyses. With at least two estimates whose relative
/// spread is under 5%, the score gains 10%, capped at 1.
#[must_use]
pub fn consensus_boost(score: f64, estimates: &[f64]) -> f64 {
    if estimates.len() < 2 {
        return score;
    }
    let max = estimates.iter().fold(f64::MIN, |m, &x| m.max(x));
    let min = estimates.iter().fold(f64::MAX, |m, &x| m.min(x));
    let scale = max.abs().max(min.abs()).max(1e-12);
    if (max - min) / scale < 0.05 {
        (score * 1.1).clamp(0.0, 1.0)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_documented_result_scores_very_high() {
        let n = Variable::n();
        let context = ConfidenceContext {
            source: SourceType::Documented,
            verification: Some(true),
            fit_r_squared: Some(0.999),
            ..ConfidenceContext::default()
        };
        let assessment = score_confidence(&Expr::poly_log(1.0, 1.0, n), &context);
        assert_eq!(assessment.level, ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn failed_verification_tanks_the_score() {
        let n = Variable::n();
        let good = ConfidenceContext {
            verification: Some(true),
            ..ConfidenceContext::default()
        };
        let bad = ConfidenceContext {
            verification: Some(false),
            ..ConfidenceContext::default()
        };
        let e = Expr::var(n);
        assert!(score_confidence(&e, &bad).score < score_confidence(&e, &good).score);
    }

    #[test]
    fn unresolved_symbolic_forms_are_penalized() {
        let n = Variable::n();
        let clean = Expr::poly_log(1.0, 0.0, n.clone());
        let symbolic = Expr::integral(
            Expr::var(n.clone()),
            Variable::new("u", crate::core::variable::VarKind::Custom),
            1.0,
            Expr::var(n),
        );
        let context = ConfidenceContext::default();
        assert!(
            score_confidence(&symbolic, &context).score
                < score_confidence(&clean, &context).score
        );
    }

    #[test]
    fn consensus_boost_requires_agreement() {
        assert!(consensus_boost(0.7, &[1.0, 1.001, 0.999]) > 0.7);
        assert!((consensus_boost(0.7, &[1.0, 2.0]) - 0.7).abs() < 1e-12);
        assert!((consensus_boost(0.7, &[1.0]) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn boundary_penalty_applies() {
        let n = Variable::n();
        let near = ConfidenceContext {
            near_case_boundary: true,
            ..ConfidenceContext::default()
        };
        let e = Expr::var(n);
        let with_penalty = score_confidence(&e, &near);
        let without = score_confidence(&e, &ConfidenceContext::default());
        assert!(with_penalty.score < without.score);
    }
}
