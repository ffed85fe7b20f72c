//! Core types for the complexity algebra.
//!
//! This module contains the fundamental types:
//! - `Expr` - the Big-O expression AST
//! - `Variable` / `VarKind` - input-size variables
//! - `SolverError` - value-level failure reasons
//! - provenance records (`ComplexitySource`, `AttributedComplexity`, ...)
//! - Display formatting (canonical Big-O text)
//! - Visitor pattern for AST traversal

mod display; // Display implementations for Expr
pub(crate) mod error; // SolverError
pub(crate) mod expr; // Expression AST
pub(crate) mod source; // Provenance records
pub(crate) mod variable; // Input-size variables
pub mod visitor; // Public visitor pattern for AST traversal

// Public re-exports (for external API)
pub use error::SolverError;
pub use expr::{
    BinaryOp, Expr, ParallelCost, ParallelPattern, ProbabilisticCost, SpecialKind,
};
pub use source::{AttributedComplexity, ComplexityResult, ComplexitySource, SourceType};
pub use variable::{VarKind, Variable};
