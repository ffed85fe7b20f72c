//! Error types for the solver layers.
//!
//! Failures inside the core are **returned as values**: solvers hand back
//! tagged results or `None`, and this enum is the payload that explains
//! why. Nothing here is ever raised across the public boundary; evaluation
//! of unbound variables and unclassifiable expressions are not errors at
//! all (they yield `None` / reduced confidence instead).

use std::fmt;

/// Reasons a solver declined or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SolverError {
    /// A recurrence parameter is outside its domain
    /// (e.g. `a ≤ 0`, scale factor outside `(0, 1)`, empty term list).
    Domain {
        /// Which parameter was invalid.
        parameter: String,
        /// The constraint it violated.
        constraint: String,
    },

    /// The recurrence does not fit any implemented theorem.
    NotApplicable {
        /// Every violated precondition, for reporting.
        reasons: Vec<String>,
    },

    /// A numerical kernel did not meet its tolerance within the iteration cap.
    NonConvergence {
        /// Which kernel failed.
        kernel: &'static str,
        /// How many iterations were spent.
        iterations: usize,
    },
}

impl SolverError {
    /// Convenience constructor for a domain violation.
    pub fn domain(parameter: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Domain {
            parameter: parameter.into(),
            constraint: constraint.into(),
        }
    }

    /// Convenience constructor for a single inapplicability reason.
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self::NotApplicable {
            reasons: vec![reason.into()],
        }
    }

    /// Convenience constructor for kernel non-convergence.
    #[must_use]
    pub const fn non_convergence(kernel: &'static str, iterations: usize) -> Self {
        Self::NonConvergence { kernel, iterations }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain {
                parameter,
                constraint,
            } => {
                write!(f, "invalid parameter {parameter}: requires {constraint}")
            }
            Self::NotApplicable { reasons } => {
                write!(f, "no theorem applies: {}", reasons.join("; "))
            }
            Self::NonConvergence { kernel, iterations } => {
                write!(f, "{kernel} did not converge within {iterations} iterations")
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_reasons() {
        let err = SolverError::NotApplicable {
            reasons: vec!["a = 0".to_owned(), "b = 1.5".to_owned()],
        };
        let text = err.to_string();
        assert!(text.contains("a = 0"));
        assert!(text.contains("b = 1.5"));
    }

    #[test]
    fn domain_constructor() {
        let err = SolverError::domain("b", "0 < b < 1");
        assert!(err.to_string().contains("0 < b < 1"));
    }
}
