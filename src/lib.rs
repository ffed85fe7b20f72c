#![forbid(unsafe_code)]
//! Complexity Algebra and Recurrence Solver
//!
//! A focused Rust library for inferring asymptotic time bounds: an
//! immutable Big-O expression algebra, a fixed-point normalizer and
//! classifier, and a theorem engine that solves divide-and-conquer
//! recurrences (Master Theorem, Akra–Bazzi), linear subtractive
//! recurrences (characteristic polynomial), and mutual-recursion
//! systems, with numerical verification and confidence scoring on top.
//!
//! # Features
//! - Value-object expressions with structural equality
//! - Composition primitives mirroring control-flow structure
//! - Canonical Big-O normalization and asymptotic comparison
//! - Master / Akra–Bazzi / characteristic-polynomial solvers
//! - Induction verification against simulated ground truth
//!
//! # Usage Examples
//!
//! ## Composing and normalizing
//! ```
//! use asymptotica::{Expr, Variable, compose, normalize};
//!
//! let n = Variable::n();
//! let body = compose::sequential(Expr::constant(3.0), Expr::var(n.clone()));
//! let loop_cost = compose::for_loop(&n, body);
//! assert_eq!(normalize(&loop_cost).big_o(), "O(n^2)");
//! ```
//!
//! ## Solving a recurrence
//! ```
//! use asymptotica::{Expr, Recurrence, RecurrenceTerm, Variable, solve};
//!
//! let n = Variable::n();
//! let merge_sort = Recurrence::new(
//!     vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
//!     n.clone(),
//!     Expr::linear(1.0, n),
//! );
//! let result = solve(&merge_sort);
//! assert_eq!(result.solution().unwrap().big_o(), "O(n * log(n))");
//! ```

pub mod compose; // Translation-contract composition primitives
mod core; // Core types: Expr, Variable, errors, provenance, Display, Visitor
mod numeric; // Numerical kernels: roots, quadrature, special functions
pub mod recurrence; // Recurrence model and theorem engine
pub mod refine; // Verification, slack fitting, confidence
mod table; // Built-in operation table
mod transform; // Simplifier, normalizer, classifier

// Re-export visitor at crate root for public API
pub use core::visitor;

#[cfg(test)]
mod tests;

// Re-export key types from core
pub use core::{
    AttributedComplexity, BinaryOp, ComplexityResult, ComplexitySource, Expr, ParallelCost,
    ParallelPattern, ProbabilisticCost, SolverError, SourceType, SpecialKind, VarKind, Variable,
};

// Recurrence model and engine
pub use recurrence::{
    LinearEvidence, LinearRecurrence, MASTER_DEGREE_EPSILON, MutualComponent, MutualResult,
    MutualSystem, Recurrence, RecurrenceTerm, Solver, SolverOutcome, TheoremResult, solve,
    solve_linear, solve_mutual,
};

// Transformer surface
pub use transform::{
    Classification, GrowthForm, are_equivalent, classify, classify_with, compare, dominates,
    drop_constant_factors, drop_lower_order_terms, is_dominated_by, normalize, simplify,
};

// Refinement surface
pub use refine::{
    BoundKind, ConfidenceAssessment, ConfidenceContext, ConfidenceLevel, RefinementResult,
    SlackFit, VerificationReport, consensus_boost, fit_constant, refine, score_confidence,
    verify_induction,
};

// Built-in operation table
pub use table::builtin_operation;
