//! Big-O expression algebra.
//!
//! [`Expr`] is an immutable sum type over the asymptotic shapes the
//! analyzer reasons about. Subtrees are shared with `Arc`; the tree is a
//! DAG only when subtrees are literally reused, so cycles are impossible
//! by construction. Equality is structural.
//!
//! Construction never simplifies: `plus(0, x)` really is a `Binary` node.
//! Identities live in the composition layer and the transformer.

mod analysis;
mod evaluate;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::variable::Variable;
use crate::recurrence::Recurrence;

/// Binary operators over complexity expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Sequential composition: `a + b`.
    Plus,
    /// Nested composition: `a · b`.
    Multiply,
    /// Branch upper bound: `max(a, b)`.
    Max,
    /// Early-exit lower envelope: `min(a, b)`.
    Min,
}

/// Special functions kept symbolic so the solver can refine them later
/// without losing provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialKind {
    /// Polylogarithm `Li_s(x)` of the given order `s`.
    Polylog {
        /// The order `s`.
        order: f64,
    },
    /// Lower incomplete gamma `γ(a, x)`.
    IncompleteGamma {
        /// The shape parameter `a`.
        shape: f64,
    },
    /// Regularized incomplete beta `I_x(a, b)`.
    IncompleteBeta {
        /// First shape parameter.
        a: f64,
        /// Second shape parameter.
        b: f64,
    },
    /// Gauss hypergeometric `₂F₁(a, b; c; x)`.
    Hypergeometric {
        /// Upper parameter `a`.
        a: f64,
        /// Upper parameter `b`.
        b: f64,
        /// Lower parameter `c`.
        c: f64,
    },
}

/// Recognized shapes of parallel computations, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParallelPattern {
    /// Map followed by an associative reduction.
    MapReduce,
    /// Fork-join task tree.
    ForkJoin,
    /// Staged pipeline.
    Pipeline,
    /// Recursive divide-and-conquer parallelism.
    DivideAndConquer,
    /// Flat data parallelism.
    DataParallel,
}

/// Work/span description of a parallel computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelCost {
    /// Total operation count across all processors.
    pub work: Arc<Expr>,
    /// Critical-path length.
    pub span: Arc<Expr>,
    /// The processor-count variable, when the schedule is explicit.
    pub processors: Option<Variable>,
    /// Shape of the computation.
    pub pattern: ParallelPattern,
    /// Task-based runtime (as opposed to static scheduling).
    pub task_based: bool,
    /// Synchronization overhead added per step, if modeled.
    pub sync_overhead: Option<Arc<Expr>>,
    /// Free-form description.
    pub description: Option<String>,
}

impl ParallelCost {
    /// Parallelism `work / span`: the greatest useful processor count.
    #[must_use]
    pub fn parallelism(&self) -> Expr {
        Expr::binary(
            BinaryOp::Multiply,
            self.work.as_ref().clone(),
            Expr::power(self.span.as_ref().clone(), -1.0),
        )
    }

    /// Running time on `p` processors: `max(work / p, span)` (Brent bound).
    #[must_use]
    pub fn parallel_time(&self, p: &Variable) -> Expr {
        let work_per_proc = Expr::binary(
            BinaryOp::Multiply,
            self.work.as_ref().clone(),
            Expr::power(Expr::var(p.clone()), -1.0),
        );
        Expr::binary(BinaryOp::Max, work_per_proc, self.span.as_ref().clone())
    }
}

/// Expected/worst description of a randomized computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilisticCost {
    /// Expected cost.
    pub expected: Arc<Expr>,
    /// Worst-case cost.
    pub worst: Arc<Expr>,
    /// Best-case cost, when known.
    pub best: Option<Arc<Expr>>,
    /// Where the randomness comes from (input distribution, coin flips).
    pub randomness: String,
    /// Distribution assumed for the analysis.
    pub distribution: String,
    /// Variance of the cost, when known.
    pub variance: Option<Arc<Expr>>,
    /// High-probability bound, when known.
    pub high_probability: Option<Arc<Expr>>,
    /// Assumptions the expectation rests on.
    pub assumptions: Vec<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// A symbolic Big-O expression.
///
/// The structured leaves (`Linear`, `Poly`, `Log`, `Exp`, `Factorial`,
/// `PolyLog`) carry their own coefficients so the common asymptotic shapes
/// stay flat; the wrapper variants (`Power`, `LogOf`, `ExpOf`,
/// `FactorialOf`) lift those shapes over whole subexpressions.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Numeric constant `c`.
    Const(f64),
    /// A bare variable, `O(v)`.
    Var(Variable),
    /// `coef · v`.
    Linear {
        /// Scalar multiplier.
        coef: f64,
        /// The variable.
        var: Variable,
    },
    /// General polynomial `Σ coeffs[d] · v^d`. Missing degrees are zero.
    Poly {
        /// Degree → coefficient. Never empty for a meaningful polynomial;
        /// an empty map means the zero polynomial.
        coeffs: BTreeMap<u32, f64>,
        /// The variable.
        var: Variable,
    },
    /// `coef · log_base(v)`.
    Log {
        /// Scalar multiplier.
        coef: f64,
        /// The variable.
        var: Variable,
        /// Logarithm base (2 unless stated otherwise).
        base: f64,
    },
    /// `coef · base^v`.
    Exp {
        /// Scalar multiplier.
        coef: f64,
        /// Exponential base.
        base: f64,
        /// The variable.
        var: Variable,
    },
    /// `coef · v!`.
    Factorial {
        /// Scalar multiplier.
        coef: f64,
        /// The variable.
        var: Variable,
    },
    /// Unified poly-log form `coef · v^degree · log_base(v)^log_exp`.
    PolyLog {
        /// Scalar multiplier.
        coef: f64,
        /// Polynomial degree (may be fractional or negative).
        degree: f64,
        /// Logarithm exponent.
        log_exp: f64,
        /// The variable.
        var: Variable,
        /// Logarithm base.
        base: f64,
    },
    /// `inner ^ exponent` over a whole subexpression.
    Power {
        /// Base expression.
        inner: Arc<Expr>,
        /// Real exponent.
        exponent: f64,
    },
    /// `log_base(inner)` over a whole subexpression.
    LogOf {
        /// Inner expression.
        inner: Arc<Expr>,
        /// Logarithm base.
        base: f64,
    },
    /// `base ^ inner` over a whole subexpression.
    ExpOf {
        /// Exponential base.
        base: f64,
        /// Inner expression.
        inner: Arc<Expr>,
    },
    /// `inner!` over a whole subexpression.
    FactorialOf {
        /// Inner expression.
        inner: Arc<Expr>,
    },
    /// Binary operator node.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Arc<Expr>,
        /// Right operand.
        right: Arc<Expr>,
    },
    /// Data-dependent branch. Evaluation is conservative: the max of the
    /// two branches.
    Conditional {
        /// What the branch depends on.
        description: String,
        /// Cost when the condition holds.
        when_true: Arc<Expr>,
        /// Cost when it does not.
        when_false: Arc<Expr>,
    },
    /// Work/span parallel cost.
    Parallel(ParallelCost),
    /// Randomized cost. The expression denotes the expected form; the
    /// worst case stays accessible on the record.
    Probabilistic(ProbabilisticCost),
    /// An unsolved recurrence embedded as a term.
    Recurrence(Arc<Recurrence>),
    /// Symbolic integral `∫_lower^upper integrand d(var)`, as produced by
    /// the Akra–Bazzi fallback.
    Integral {
        /// The integrand, a function of `var`.
        integrand: Arc<Expr>,
        /// Integration variable.
        var: Variable,
        /// Lower limit.
        lower: f64,
        /// Upper limit (usually the recurrence variable).
        upper: Arc<Expr>,
        /// Asymptotic bound of the integral, once the solver derives one.
        bound: Option<Arc<Expr>>,
    },
    /// Symbolic special-function application.
    Special {
        /// Which function.
        kind: SpecialKind,
        /// Its argument.
        arg: Arc<Expr>,
    },
}

impl Expr {
    // -------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------

    /// Numeric constant.
    #[must_use]
    pub const fn constant(c: f64) -> Self {
        Self::Const(c)
    }

    /// A bare variable.
    #[must_use]
    pub const fn var(v: Variable) -> Self {
        Self::Var(v)
    }

    /// `coef · v`.
    #[must_use]
    pub const fn linear(coef: f64, var: Variable) -> Self {
        Self::Linear { coef, var }
    }

    /// Polynomial from `(degree, coefficient)` pairs.
    #[must_use]
    pub fn poly<I: IntoIterator<Item = (u32, f64)>>(coeffs: I, var: Variable) -> Self {
        Self::Poly {
            coeffs: coeffs.into_iter().collect(),
            var,
        }
    }

    /// `coef · log₂(v)`.
    #[must_use]
    pub const fn log(coef: f64, var: Variable) -> Self {
        Self::Log {
            coef,
            var,
            base: 2.0,
        }
    }

    /// `coef · log_base(v)`.
    #[must_use]
    pub const fn log_base(coef: f64, var: Variable, base: f64) -> Self {
        Self::Log { coef, var, base }
    }

    /// `base^v`.
    #[must_use]
    pub const fn exp(base: f64, var: Variable) -> Self {
        Self::Exp {
            coef: 1.0,
            base,
            var,
        }
    }

    /// `v!`.
    #[must_use]
    pub const fn factorial(var: Variable) -> Self {
        Self::Factorial { coef: 1.0, var }
    }

    /// `v^degree · log₂(v)^log_exp`.
    #[must_use]
    pub const fn poly_log(degree: f64, log_exp: f64, var: Variable) -> Self {
        Self::PolyLog {
            coef: 1.0,
            degree,
            log_exp,
            var,
            base: 2.0,
        }
    }

    /// `coef · v^degree · log_base(v)^log_exp`.
    #[must_use]
    pub const fn poly_log_full(
        coef: f64,
        degree: f64,
        log_exp: f64,
        var: Variable,
        base: f64,
    ) -> Self {
        Self::PolyLog {
            coef,
            degree,
            log_exp,
            var,
            base,
        }
    }

    /// `inner^exponent`.
    #[must_use]
    pub fn power(inner: Self, exponent: f64) -> Self {
        Self::Power {
            inner: Arc::new(inner),
            exponent,
        }
    }

    /// `log_base(inner)`.
    #[must_use]
    pub fn log_of(inner: Self, base: f64) -> Self {
        Self::LogOf {
            inner: Arc::new(inner),
            base,
        }
    }

    /// `base^inner`.
    #[must_use]
    pub fn exp_of(base: f64, inner: Self) -> Self {
        Self::ExpOf {
            base,
            inner: Arc::new(inner),
        }
    }

    /// `inner!`.
    #[must_use]
    pub fn factorial_of(inner: Self) -> Self {
        Self::FactorialOf {
            inner: Arc::new(inner),
        }
    }

    /// Binary operator node.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }

    /// Binary node over already-shared operands.
    #[must_use]
    pub const fn binary_from_arcs(op: BinaryOp, left: Arc<Self>, right: Arc<Self>) -> Self {
        Self::Binary { op, left, right }
    }

    /// `a + b`.
    #[must_use]
    pub fn plus(left: Self, right: Self) -> Self {
        Self::binary(BinaryOp::Plus, left, right)
    }

    /// `a · b`.
    #[must_use]
    pub fn times(left: Self, right: Self) -> Self {
        Self::binary(BinaryOp::Multiply, left, right)
    }

    /// `max(a, b)`.
    #[must_use]
    pub fn max_of(left: Self, right: Self) -> Self {
        Self::binary(BinaryOp::Max, left, right)
    }

    /// `min(a, b)`.
    #[must_use]
    pub fn min_of(left: Self, right: Self) -> Self {
        Self::binary(BinaryOp::Min, left, right)
    }

    /// Work/span parallel cost node.
    #[must_use]
    pub const fn parallel(cost: ParallelCost) -> Self {
        Self::Parallel(cost)
    }

    /// Randomized cost node.
    #[must_use]
    pub const fn probabilistic(cost: ProbabilisticCost) -> Self {
        Self::Probabilistic(cost)
    }

    /// Data-dependent branch node.
    #[must_use]
    pub fn conditional(description: &str, when_true: Self, when_false: Self) -> Self {
        Self::Conditional {
            description: description.to_owned(),
            when_true: Arc::new(when_true),
            when_false: Arc::new(when_false),
        }
    }

    /// Embed an unsolved recurrence.
    #[must_use]
    pub fn recurrence(rec: Recurrence) -> Self {
        Self::Recurrence(Arc::new(rec))
    }

    /// Symbolic integral `∫_lower^upper integrand d(var)`.
    #[must_use]
    pub fn integral(integrand: Self, var: Variable, lower: f64, upper: Self) -> Self {
        Self::Integral {
            integrand: Arc::new(integrand),
            var,
            lower,
            upper: Arc::new(upper),
            bound: None,
        }
    }

    /// Symbolic special-function application.
    #[must_use]
    pub fn special(kind: SpecialKind, arg: Self) -> Self {
        Self::Special {
            kind,
            arg: Arc::new(arg),
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The constant value, if this is a `Const` node.
    #[must_use]
    pub const fn as_const(&self) -> Option<f64> {
        match self {
            Self::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Whether this is the constant zero (exact).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Const(c) if *c == 0.0)
    }

    /// Whether this is the constant one (exact).
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Const(c) if *c == 1.0)
    }

    /// Degree of a `Poly` node: the largest degree with a coefficient, or
    /// 0 for the empty map. `None` for other variants.
    #[must_use]
    pub fn poly_degree(&self) -> Option<u32> {
        match self {
            Self::Poly { coeffs, .. } => Some(coeffs.keys().max().copied().unwrap_or(0)),
            _ => None,
        }
    }

    /// Leading coefficient of a `Poly` node. `None` for other variants.
    #[must_use]
    pub fn leading_coef(&self) -> Option<f64> {
        match self {
            Self::Poly { coeffs, .. } => {
                let degree = coeffs.keys().max().copied().unwrap_or(0);
                Some(coeffs.get(&degree).copied().unwrap_or(0.0))
            }
            _ => None,
        }
    }

    /// Pure-polynomial predicate for `PolyLog` (no log factor).
    #[must_use]
    pub fn is_pure_poly(&self) -> bool {
        matches!(self, Self::PolyLog { log_exp, .. } if log_exp.abs() < 1e-12)
    }

    /// Pure-logarithm predicate for `PolyLog` (no polynomial factor).
    #[must_use]
    pub fn is_pure_log(&self) -> bool {
        matches!(self, Self::PolyLog { degree, .. } if degree.abs() < 1e-12)
    }

    /// The classic `n log n` predicate for `PolyLog`.
    #[must_use]
    pub fn is_n_log_n(&self) -> bool {
        matches!(
            self,
            Self::PolyLog { degree, log_exp, .. }
                if (degree - 1.0).abs() < 1e-12 && (log_exp - 1.0).abs() < 1e-12
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let n = Variable::n();
        let a = Expr::plus(Expr::var(n.clone()), Expr::constant(1.0));
        let b = Expr::plus(Expr::var(n), Expr::constant(1.0));
        assert_eq!(a, b);
    }

    #[test]
    fn poly_degree_and_leading_coef() {
        let p = Expr::poly([(0, 3.0), (2, 5.0)], Variable::n());
        assert_eq!(p.poly_degree(), Some(2));
        assert_eq!(p.leading_coef(), Some(5.0));

        let zero = Expr::poly([], Variable::n());
        assert_eq!(zero.poly_degree(), Some(0));
    }

    #[test]
    fn polylog_predicates() {
        let n = Variable::n();
        assert!(Expr::poly_log(2.0, 0.0, n.clone()).is_pure_poly());
        assert!(Expr::poly_log(0.0, 1.0, n.clone()).is_pure_log());
        assert!(Expr::poly_log(1.0, 1.0, n).is_n_log_n());
    }
}
