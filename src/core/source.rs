//! Provenance records for complexity estimates.
//!
//! Every estimate the crate hands out carries where it came from and how
//! much to trust it. [`SourceType`] orders the possible origins by
//! authority; [`AttributedComplexity`] pairs an expression with its source;
//! [`ComplexityResult`] adds location and sub-results so explanations can
//! be reconstructed by the caller.

use std::sync::Arc;

use super::expr::Expr;

/// Where a complexity figure came from, ordered by authority.
///
/// `Documented < Attested < ...` is reversed on purpose: the derived `Ord`
/// ranks `Documented` as the **most** authoritative (smallest), so
/// `min`-combining sources keeps the best provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SourceType {
    /// Stated in official documentation of the operation.
    Documented,
    /// Asserted by the library author or a maintainer.
    Attested,
    /// Measured empirically.
    Empirical,
    /// Derived by this analyzer from structure.
    Inferred,
    /// Guessed from naming or shape.
    Heuristic,
    /// No information at all.
    Unknown,
}

impl SourceType {
    /// Base trust weight in `[0, 1]` used by the confidence scorer.
    #[must_use]
    pub const fn authority(self) -> f64 {
        match self {
            Self::Documented => 1.0,
            Self::Attested => 0.9,
            Self::Empirical => 0.75,
            Self::Inferred => 0.65,
            Self::Heuristic => 0.4,
            Self::Unknown => 0.2,
        }
    }
}

/// Provenance of a single complexity figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexitySource {
    /// Origin category.
    pub source_type: SourceType,
    /// Citation text (doc URL, paper, commit), if any.
    pub citation: Option<String>,
    /// Source-local confidence in `[0, 1]`.
    pub confidence: f64,
    /// The figure is an upper bound (O) rather than a tight bound (Θ).
    pub is_upper_bound: bool,
    /// The figure is amortized over a sequence of operations.
    pub is_amortized: bool,
    /// The figure describes the worst case.
    pub is_worst_case: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the figure was last checked against reality, if ever.
    pub last_verified: Option<String>,
}

impl ComplexitySource {
    /// A source of the given type with defaults for everything else.
    #[must_use]
    pub fn of(source_type: SourceType) -> Self {
        Self {
            source_type,
            citation: None,
            confidence: source_type.authority(),
            is_upper_bound: false,
            is_amortized: false,
            is_worst_case: true,
            notes: None,
            last_verified: None,
        }
    }

    /// An analyzer-derived source with the given confidence.
    #[must_use]
    pub fn inferred(confidence: f64) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            ..Self::of(SourceType::Inferred)
        }
    }

    /// A heuristic guess, low confidence, marked as an upper bound.
    #[must_use]
    pub fn heuristic() -> Self {
        Self {
            is_upper_bound: true,
            ..Self::of(SourceType::Heuristic)
        }
    }
}

/// An expression together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedComplexity {
    /// The complexity expression.
    pub expression: Arc<Expr>,
    /// Where it came from.
    pub source: ComplexitySource,
    /// The surface layer could not fully model this procedure.
    pub requires_review: bool,
    /// Why review is required, when it is.
    pub review_reason: Option<String>,
}

impl AttributedComplexity {
    /// Attribute `expression` to `source`.
    #[must_use]
    pub fn new(expression: Expr, source: ComplexitySource) -> Self {
        Self {
            expression: Arc::new(expression),
            source,
            requires_review: false,
            review_reason: None,
        }
    }

    /// Mark this estimate as incomplete; the flag propagates through
    /// composition and lowers the overall confidence score.
    #[must_use]
    pub fn incomplete(mut self, reason: &str) -> Self {
        self.requires_review = true;
        self.review_reason = Some(reason.to_owned());
        self
    }
}

/// Final analysis result for one procedure.
///
/// Sub-results keep the per-callee attributions so a caller can render an
/// explanation tree without re-running the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityResult {
    /// The solved, normalized complexity expression.
    pub expression: Arc<Expr>,
    /// Provenance of the result.
    pub source: ComplexitySource,
    /// Source location of the analyzed procedure, if the surface knows it.
    pub location: Option<String>,
    /// Attributed results of constituent parts.
    pub sub_results: Vec<AttributedComplexity>,
}

impl ComplexityResult {
    /// Wrap a finished expression.
    #[must_use]
    pub fn new(expression: Expr, source: ComplexitySource) -> Self {
        Self {
            expression: Arc::new(expression),
            source,
            location: None,
            sub_results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_ordering() {
        assert!(SourceType::Documented < SourceType::Heuristic);
        assert!(SourceType::Documented.authority() > SourceType::Unknown.authority());
    }

    #[test]
    fn incomplete_marks_review() {
        let attr = AttributedComplexity::new(
            Expr::constant(1.0),
            ComplexitySource::of(SourceType::Inferred),
        )
        .incomplete("unmodeled native call");
        assert!(attr.requires_review);
        assert!(attr.review_reason.is_some());
    }
}
