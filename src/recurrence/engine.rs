//! Theorem dispatch.
//!
//! Per call the engine moves through a small state machine:
//!
//! ```text
//! Start → CheckApplicability → {Master, AkraBazzi, Linear, Mutual, NotApplicable}
//! Applicable → Solve → {Solved(expression, evidence), NotApplicable}
//! Solved → Refine? → {Refined, Kept}
//! ```
//!
//! No state persists across calls; every input is a value object and
//! every failure is returned, never raised.

use super::akra_bazzi::solve_akra_bazzi;
use super::linear::solve_linear_recurrence;
use super::master::{MASTER_DEGREE_EPSILON, MasterOutcome, try_master};
use super::mutual::solve_mutual_system;
use super::{LinearRecurrence, MutualSystem, Recurrence};
use crate::core::error::SolverError;
use crate::core::expr::Expr;
use crate::core::source::SourceType;
use crate::refine::confidence::{ConfidenceAssessment, ConfidenceContext, score_confidence};
use crate::refine::{RefinementResult, refine};

/// Evidence attached to a solved linear recurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEvidence {
    /// Magnitude of the dominant characteristic root.
    pub dominant_root: f64,
    /// Its multiplicity.
    pub multiplicity: usize,
    /// Number of distinct roots found.
    pub distinct_roots: usize,
}

/// Tagged outcome of the theorem engine, carrying the solved expression
/// and the evidence for the case that fired.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TheoremResult {
    /// Master Theorem Case 1: the recursion tree dominates.
    MasterCase1 {
        /// `Θ(n^(log_b a))`.
        solution: Expr,
        /// The exponent `log_b a`.
        log_b_a: f64,
        /// Distance `|d − log_b a|` to the case boundary.
        gap: f64,
    },
    /// Master Theorem Case 2: tree and work balance.
    MasterCase2 {
        /// `Θ(n^d · log^(k+1) n)`.
        solution: Expr,
        /// The shared exponent `d`.
        degree: f64,
        /// The resulting log power `k + 1`.
        log_power: f64,
        /// Distance `|d − log_b a|` within the band.
        gap: f64,
    },
    /// Master Theorem Case 3: the work dominates.
    MasterCase3 {
        /// `Θ(f(n))`.
        solution: Expr,
        /// The regularity constant `a·b^(−d) < 1`.
        regularity_constant: f64,
        /// Distance `|d − log_b a|` to the case boundary.
        gap: f64,
    },
    /// Akra–Bazzi with the computed critical exponent.
    AkraBazzi {
        /// The solution, closed-form when possible.
        solution: Expr,
        /// The critical exponent `p*`.
        critical_exponent: f64,
        /// Whether the integral admitted a closed form.
        closed_form: bool,
    },
    /// Linear subtractive recurrence solved by characteristic roots.
    LinearSolved {
        /// The asymptotic solution.
        solution: Expr,
        /// Root evidence.
        evidence: LinearEvidence,
    },
    /// No theorem applies; every violated condition is listed.
    NotApplicable {
        /// The violated preconditions.
        reasons: Vec<String>,
    },
}

impl TheoremResult {
    /// The solved expression, when there is one.
    #[must_use]
    pub const fn solution(&self) -> Option<&Expr> {
        match self {
            Self::MasterCase1 { solution, .. }
            | Self::MasterCase2 { solution, .. }
            | Self::MasterCase3 { solution, .. }
            | Self::AkraBazzi { solution, .. }
            | Self::LinearSolved { solution, .. } => Some(solution),
            Self::NotApplicable { .. } => None,
        }
    }

    /// Whether a solution was produced.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solution().is_some()
    }

    /// Short tag for reporting.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::MasterCase1 { .. } => "Master Theorem case 1",
            Self::MasterCase2 { .. } => "Master Theorem case 2",
            Self::MasterCase3 { .. } => "Master Theorem case 3",
            Self::AkraBazzi { .. } => "Akra-Bazzi",
            Self::LinearSolved { .. } => "linear recurrence",
            Self::NotApplicable { .. } => "not applicable",
        }
    }

    /// Whether the solution sits close to a theorem case boundary, where
    /// the confidence scorer applies a penalty.
    #[must_use]
    pub fn near_case_boundary(&self) -> bool {
        match self {
            Self::MasterCase1 { gap, .. } | Self::MasterCase3 { gap, .. } => {
                *gap <= 2.0 * MASTER_DEGREE_EPSILON
            }
            Self::MasterCase2 { gap, .. } => *gap > MASTER_DEGREE_EPSILON / 2.0,
            Self::AkraBazzi { .. } | Self::LinearSolved { .. } | Self::NotApplicable { .. } => {
                false
            }
        }
    }
}

/// Result of collapsing and solving a mutual system.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualResult {
    /// Every component of the cycle with its (shared) solution.
    pub per_component: Vec<(String, Expr)>,
    /// The collapsed subtractive recurrence, when the system was valid.
    pub collapsed: Option<LinearRecurrence>,
    /// The underlying solver outcome.
    pub result: TheoremResult,
}

/// Solve a divide-and-conquer or subtractive recurrence.
///
/// Dispatch order: Master Theorem, then Akra–Bazzi, then the linear
/// solver for subtractive shapes. Invalid parameters come back as
/// [`TheoremResult::NotApplicable`] with every violated condition named.
#[must_use]
pub fn solve(rec: &Recurrence) -> TheoremResult {
    if rec.terms.is_empty() {
        return TheoremResult::NotApplicable {
            reasons: vec!["empty term list".to_owned()],
        };
    }

    if rec.is_subtractive() {
        return match rec.as_linear() {
            Some(linear) => solve_linear_recurrence(&linear),
            None => TheoremResult::NotApplicable {
                reasons: vec!["subtractive terms could not be normalized".to_owned()],
            },
        };
    }

    if !rec.is_divide_and_conquer() {
        return TheoremResult::NotApplicable {
            reasons: vec!["mixed scaled and subtractive terms".to_owned()],
        };
    }

    let mut violations = Vec::new();
    for (i, term) in rec.terms.iter().enumerate() {
        if !(term.coefficient.is_finite() && term.coefficient > 0.0) {
            violations.push(
                SolverError::domain(
                    format!("a{} = {}", i + 1, term.coefficient),
                    "a > 0",
                )
                .to_string(),
            );
        }
        if !(term.scale.is_finite() && term.scale > 0.0 && term.scale < 1.0) {
            violations.push(
                SolverError::domain(format!("b{} = {}", i + 1, term.scale), "0 < b < 1")
                    .to_string(),
            );
        }
    }
    if !violations.is_empty() {
        return TheoremResult::NotApplicable {
            reasons: violations,
        };
    }

    match try_master(rec) {
        MasterOutcome::Applied(result) => result,
        MasterOutcome::Failed(reasons) => TheoremResult::NotApplicable { reasons },
        MasterOutcome::Defer(_) => solve_akra_bazzi(rec),
    }
}

/// Solve a linear subtractive recurrence by characteristic roots.
#[must_use]
pub fn solve_linear(rec: &LinearRecurrence) -> TheoremResult {
    solve_linear_recurrence(rec)
}

/// Collapse and solve a mutual-recursion system.
#[must_use]
pub fn solve_mutual(system: &MutualSystem) -> MutualResult {
    solve_mutual_system(system)
}

/// Outcome of a [`Solver`] run: the theorem result plus the optional
/// refinement pass and the overall confidence.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    /// The theorem engine's result.
    pub theorem: TheoremResult,
    /// Refinement report, when refinement ran on a solved recurrence.
    pub refinement: Option<RefinementResult>,
    /// Overall confidence in the final expression.
    pub confidence: ConfidenceAssessment,
}

impl SolverOutcome {
    /// The best expression available: refined when the refinement pass
    /// ran, the raw theorem solution otherwise.
    #[must_use]
    pub fn expression(&self) -> Option<&Expr> {
        self.refinement
            .as_ref()
            .map_or_else(|| self.theorem.solution(), |r| Some(&r.expression))
    }
}

/// Builder over [`solve`] that optionally runs the refinement layer and
/// always scores confidence.
///
/// ```
/// use asymptotica::{Expr, Recurrence, RecurrenceTerm, Solver, Variable};
///
/// let n = Variable::n();
/// let rec = Recurrence::new(
///     vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
///     n.clone(),
///     Expr::linear(1.0, n),
/// );
/// let outcome = Solver::new().refine(true).solve(&rec);
/// assert_eq!(outcome.expression().unwrap().big_o(), "O(n * log(n))");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    refinement: bool,
}

impl Solver {
    /// A solver with refinement off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the refinement pass.
    #[must_use]
    pub const fn refine(mut self, enabled: bool) -> Self {
        self.refinement = enabled;
        self
    }

    /// Solve `rec`, refine if requested, and score confidence.
    #[must_use]
    pub fn solve(&self, rec: &Recurrence) -> SolverOutcome {
        let theorem = solve(rec);
        let refinement = if self.refinement && theorem.is_solved() {
            Some(refine(rec, &theorem))
        } else {
            None
        };

        let context = ConfidenceContext {
            source: SourceType::Inferred,
            verification: refinement
                .as_ref()
                .map(|r| r.verification.verified),
            fit_r_squared: refinement.as_ref().and_then(|r| r.r_squared),
            near_case_boundary: theorem.near_case_boundary(),
            incomplete: false,
        };
        let scored_expr = refinement.as_ref().map_or_else(
            || theorem.solution().cloned().unwrap_or(Expr::Const(0.0)),
            |r| r.expression.clone(),
        );
        let confidence = score_confidence(&scored_expr, &context);

        SolverOutcome {
            theorem,
            refinement,
            confidence,
        }
    }
}
