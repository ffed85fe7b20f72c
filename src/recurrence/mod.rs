//! Recurrence model and theorem engine.
//!
//! Three recurrence shapes are modeled:
//! - divide-and-conquer: `T(n) = Σᵢ aᵢ·T(bᵢ·n) + f(n)` with `bᵢ ∈ (0, 1)`,
//! - linear subtractive: `T(n) = Σᵢ cᵢ·T(n−i) + f(n)`,
//! - mutual systems: a strongly connected set of procedures whose cycle
//!   collapses to a subtractive recurrence.
//!
//! [`engine`] dispatches a recurrence to the Master Theorem, Akra–Bazzi,
//! the characteristic-polynomial solver, or the mutual reducer.

pub(crate) mod akra_bazzi;
pub mod engine;
pub(crate) mod linear;
pub(crate) mod master;
pub(crate) mod mutual;

use std::sync::Arc;

use crate::core::expr::Expr;
use crate::core::variable::Variable;

/// One recursive call `coefficient · T(scale · n − shift)`.
///
/// Divide-and-conquer terms have `shift == 0` and `scale ∈ (0, 1)`;
/// subtractive terms have `scale == 1` and `shift ≥ 1`. The engine
/// dispatches on which shape every term of a recurrence has.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceTerm {
    /// Number of recursive calls of this shape (`a`), must be positive.
    pub coefficient: f64,
    /// Fraction of the input passed down (`b`); 1 for subtractive terms.
    pub scale: f64,
    /// Integer reduction (`i` in `T(n − i)`); 0 for scaled terms.
    pub shift: u32,
    /// The subproblem argument as an expression (e.g. `n/2`), kept for
    /// rendering and induction checks.
    pub argument: Arc<Expr>,
}

impl RecurrenceTerm {
    /// A divide-and-conquer term `coefficient · T(scale · var)`.
    #[must_use]
    pub fn scaled(coefficient: f64, scale: f64, variable: &Variable) -> Self {
        Self {
            coefficient,
            scale,
            shift: 0,
            argument: Arc::new(Expr::linear(scale, variable.clone())),
        }
    }

    /// A subtractive term `coefficient · T(var − shift)`.
    #[must_use]
    pub fn shifted(coefficient: f64, shift: u32, variable: &Variable) -> Self {
        Self {
            coefficient,
            scale: 1.0,
            shift,
            argument: Arc::new(Expr::plus(
                Expr::var(variable.clone()),
                Expr::constant(-f64::from(shift)),
            )),
        }
    }

    /// Whether this is a pure divide-and-conquer term.
    #[must_use]
    pub const fn is_scaled(&self) -> bool {
        self.shift == 0
    }

    /// Whether this is a pure subtractive term.
    #[must_use]
    pub fn is_shifted(&self) -> bool {
        self.shift >= 1 && (self.scale - 1.0).abs() < 1e-12
    }
}

/// A divide-and-conquer recurrence `T(n) = Σᵢ aᵢ·T(bᵢ·n) + f(n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    /// The recursive terms.
    pub terms: Vec<RecurrenceTerm>,
    /// The variable the recurrence runs over.
    pub variable: Variable,
    /// Non-recursive work `f(n)` done at each level.
    pub work: Arc<Expr>,
    /// Value of `T` at the base size (taken as `T(1)`).
    pub base_case: f64,
}

impl Recurrence {
    /// Build a recurrence over `variable`.
    #[must_use]
    pub fn new(terms: Vec<RecurrenceTerm>, variable: Variable, work: Expr) -> Self {
        Self {
            terms,
            variable,
            work: Arc::new(work),
            base_case: 1.0,
        }
    }

    /// Override the base-case value.
    #[must_use]
    pub fn with_base_case(mut self, base_case: f64) -> Self {
        self.base_case = base_case;
        self
    }

    /// The `(aᵢ, bᵢ)` pairs fed to the numeric kernels.
    #[must_use]
    pub fn term_pairs(&self) -> Vec<(f64, f64)> {
        self.terms
            .iter()
            .map(|t| (t.coefficient, t.scale))
            .collect()
    }

    /// Whether every term is a pure divide-and-conquer term.
    #[must_use]
    pub fn is_divide_and_conquer(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(RecurrenceTerm::is_scaled)
    }

    /// Whether every term is a pure subtractive term, making this a
    /// linear recurrence in disguise.
    #[must_use]
    pub fn is_subtractive(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(RecurrenceTerm::is_shifted)
    }

    /// Reinterpret a subtractive recurrence as a [`LinearRecurrence`].
    ///
    /// Returns `None` unless every term has the shape `c · T(n − i)`.
    #[must_use]
    pub fn as_linear(&self) -> Option<LinearRecurrence> {
        if !self.is_subtractive() {
            return None;
        }
        let order = self.terms.iter().map(|t| t.shift).max()? as usize;
        let mut coefficients = vec![0.0; order];
        for term in &self.terms {
            coefficients[term.shift as usize - 1] += term.coefficient;
        }
        Some(
            LinearRecurrence::new(
                coefficients,
                self.variable.clone(),
                self.work.as_ref().clone(),
            )
            .with_base_case(self.base_case),
        )
    }
}

/// A linear subtractive recurrence `T(n) = Σᵢ cᵢ·T(n−i) + f(n)`.
///
/// `coefficients[0]` multiplies `T(n−1)`, `coefficients[1]` multiplies
/// `T(n−2)`, and so on. Zero coefficients are allowed (gaps in the
/// history), trailing zeros are not meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRecurrence {
    /// History coefficients `c₁ … c_k`.
    pub coefficients: Vec<f64>,
    /// The variable the recurrence runs over.
    pub variable: Variable,
    /// Non-recursive work `f(n)` per step.
    pub work: Arc<Expr>,
    /// Value of `T` at the base sizes.
    pub base_case: f64,
}

impl LinearRecurrence {
    /// Build a subtractive recurrence over `variable`.
    #[must_use]
    pub fn new(coefficients: Vec<f64>, variable: Variable, work: Expr) -> Self {
        Self {
            coefficients,
            variable,
            work: Arc::new(work),
            base_case: 1.0,
        }
    }

    /// Override the base-case value.
    #[must_use]
    pub fn with_base_case(mut self, base_case: f64) -> Self {
        self.base_case = base_case;
        self
    }

    /// Order of the recurrence (the deepest history index `k`).
    #[must_use]
    pub fn order(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|c| c.abs() > 0.0)
            .map_or(0, |i| i + 1)
    }
}

/// One procedure inside a mutually recursive cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualComponent {
    /// Procedure name, for reporting.
    pub name: String,
    /// How much the argument shrinks when this component calls the next
    /// one around the cycle.
    pub step: f64,
    /// Non-recursive work this component does per visit.
    pub work: Arc<Expr>,
}

impl MutualComponent {
    /// A component that reduces the argument by `step` and does `work`.
    #[must_use]
    pub fn new(name: &str, step: f64, work: Expr) -> Self {
        Self {
            name: name.to_owned(),
            step,
            work: Arc::new(work),
        }
    }
}

/// A strongly connected component of mutually recursive procedures.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualSystem {
    /// The cycle members, in call order.
    pub components: Vec<MutualComponent>,
    /// The shared variable.
    pub variable: Variable,
}

impl MutualSystem {
    /// Build a mutual system over `variable`.
    #[must_use]
    pub const fn new(components: Vec<MutualComponent>, variable: Variable) -> Self {
        Self {
            components,
            variable,
        }
    }
}

pub use engine::{
    LinearEvidence, MutualResult, Solver, SolverOutcome, TheoremResult, solve, solve_linear,
    solve_mutual,
};
pub use master::MASTER_DEGREE_EPSILON;
