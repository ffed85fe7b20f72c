//! Input-size variables.
//!
//! A [`Variable`] names one axis of input growth (element count, vertex
//! count, string length, ...). Variables are plain value objects: equality
//! and hashing cover `(name, kind)` only, so two analyses that talk about
//! `n` as an input size agree regardless of attached documentation.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Closed set of roles an input-size variable can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum VarKind {
    /// Generic input size (the classic `n`).
    InputSize,
    /// Number of data elements processed.
    DataCount,
    /// Number of vertices in a graph.
    VertexCount,
    /// Number of edges in a graph.
    EdgeCount,
    /// Sum of vertex degrees.
    DegreeSum,
    /// Height of a tree structure.
    TreeHeight,
    /// Number of processors available to a parallel computation.
    ProcessorCount,
    /// Dimensionality of the data.
    Dimensions,
    /// Length of a string input.
    StringLength,
    /// Size of a secondary input (the classic `m`).
    SecondarySize,
    /// Anything not covered by the closed tags.
    Custom,
}

/// A named input-size variable.
///
/// Clone-cheap: the name and description are shared `Arc<str>`s.
///
/// ```
/// use asymptotica::{VarKind, Variable};
///
/// let n = Variable::n();
/// assert_eq!(n.name(), "n");
/// assert_eq!(n.kind(), VarKind::InputSize);
/// ```
#[derive(Debug, Clone)]
pub struct Variable {
    name: Arc<str>,
    kind: VarKind,
    description: Option<Arc<str>>,
}

impl Variable {
    /// Create a variable with the given name and kind.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or contains only whitespace.
    #[must_use]
    pub fn new(name: &str, kind: VarKind) -> Self {
        assert!(
            !name.trim().is_empty(),
            "variable name must be non-empty and non-whitespace"
        );
        Self {
            name: Arc::from(name),
            kind,
            description: None,
        }
    }

    /// Attach a human-readable description.
    ///
    /// The description is carried for reporting only; it does not take part
    /// in equality or hashing.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(Arc::from(description));
        self
    }

    /// The variable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's kind tag.
    #[must_use]
    pub const fn kind(&self) -> VarKind {
        self.kind
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    // -------------------------------------------------------------------
    // Canonical instances
    // -------------------------------------------------------------------

    /// Canonical input size `n`.
    #[must_use]
    pub fn n() -> Self {
        Self::new("n", VarKind::InputSize)
    }

    /// Canonical vertex count `V`.
    #[must_use]
    pub fn v() -> Self {
        Self::new("V", VarKind::VertexCount)
    }

    /// Canonical edge count `E`.
    #[must_use]
    pub fn e() -> Self {
        Self::new("E", VarKind::EdgeCount)
    }

    /// Canonical secondary size `m`.
    #[must_use]
    pub fn m() -> Self {
        Self::new("m", VarKind::SecondarySize)
    }

    /// Canonical selection count `k`.
    #[must_use]
    pub fn k() -> Self {
        Self::new("k", VarKind::DataCount)
    }

    /// Canonical tree height `h`.
    #[must_use]
    pub fn h() -> Self {
        Self::new("h", VarKind::TreeHeight)
    }

    /// Canonical processor count `p`.
    #[must_use]
    pub fn p() -> Self {
        Self::new("p", VarKind::ProcessorCount)
    }
}

// Equality and hashing cover (name, kind) only; descriptions are metadata.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
    }
}

// Ordering by name then kind gives deterministic rendering of
// multi-variable expressions.
impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_description() {
        let a = Variable::new("n", VarKind::InputSize);
        let b = Variable::new("n", VarKind::InputSize).with_description("element count");
        assert_eq!(a, b);
    }

    #[test]
    fn kind_distinguishes_variables() {
        let a = Variable::new("n", VarKind::InputSize);
        let b = Variable::new("n", VarKind::StringLength);
        assert_ne!(a, b);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn whitespace_name_rejected() {
        drop(Variable::new("   ", VarKind::Custom));
    }

    #[test]
    fn canonical_instances() {
        assert_eq!(Variable::v().kind(), VarKind::VertexCount);
        assert_eq!(Variable::e().kind(), VarKind::EdgeCount);
        assert_eq!(Variable::p().kind(), VarKind::ProcessorCount);
        assert_eq!(Variable::h().name(), "h");
    }
}
