//! Visitor pattern for expression traversal.
//!
//! Implement [`ExprVisitor`] to walk an expression without writing the
//! recursion by hand. Every method defaults to "continue into children",
//! so a visitor only overrides the variants it cares about.

use crate::core::expr::{BinaryOp, Expr, ParallelCost, ProbabilisticCost, SpecialKind};
use crate::core::variable::Variable;
use crate::recurrence::Recurrence;
use rustc_hash::FxHashSet;

/// Trait for visiting expression nodes.
///
/// Each method returns `true` to keep walking into the node's children.
/// All methods have defaults, so implementors override only what they
/// need; unknown future variants are skipped harmlessly.
#[allow(unused_variables, reason = "default impls intentionally ignore their arguments")]
pub trait ExprVisitor {
    /// Visit a numeric constant.
    fn visit_const(&mut self, value: f64) -> bool {
        true
    }
    /// Visit a bare variable.
    fn visit_var(&mut self, var: &Variable) -> bool {
        true
    }
    /// Visit a `coef · v` leaf.
    fn visit_linear(&mut self, coef: f64, var: &Variable) -> bool {
        true
    }
    /// Visit a polynomial leaf.
    fn visit_poly(&mut self, var: &Variable) -> bool {
        true
    }
    /// Visit a logarithm leaf.
    fn visit_log(&mut self, coef: f64, var: &Variable, base: f64) -> bool {
        true
    }
    /// Visit an exponential leaf.
    fn visit_exp(&mut self, coef: f64, base: f64, var: &Variable) -> bool {
        true
    }
    /// Visit a factorial leaf.
    fn visit_factorial(&mut self, coef: f64, var: &Variable) -> bool {
        true
    }
    /// Visit a poly-log leaf.
    fn visit_poly_log(&mut self, degree: f64, log_exp: f64, var: &Variable) -> bool {
        true
    }
    /// Visit a symbolic power wrapper.
    fn visit_power(&mut self, inner: &Expr, exponent: f64) -> bool {
        true
    }
    /// Visit a symbolic logarithm wrapper.
    fn visit_log_of(&mut self, inner: &Expr, base: f64) -> bool {
        true
    }
    /// Visit a symbolic exponential wrapper.
    fn visit_exp_of(&mut self, base: f64, inner: &Expr) -> bool {
        true
    }
    /// Visit a symbolic factorial wrapper.
    fn visit_factorial_of(&mut self, inner: &Expr) -> bool {
        true
    }
    /// Visit a binary operator node.
    fn visit_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> bool {
        true
    }
    /// Visit a conditional node.
    fn visit_conditional(&mut self, description: &str, when_true: &Expr, when_false: &Expr) -> bool {
        true
    }
    /// Visit a parallel cost node.
    fn visit_parallel(&mut self, cost: &ParallelCost) -> bool {
        true
    }
    /// Visit a probabilistic cost node.
    fn visit_probabilistic(&mut self, cost: &ProbabilisticCost) -> bool {
        true
    }
    /// Visit an embedded recurrence.
    fn visit_recurrence(&mut self, rec: &Recurrence) -> bool {
        true
    }
    /// Visit a symbolic integral.
    fn visit_integral(&mut self, integrand: &Expr, var: &Variable, upper: &Expr) -> bool {
        true
    }
    /// Visit a special-function node.
    fn visit_special(&mut self, kind: SpecialKind, arg: &Expr) -> bool {
        true
    }
}

/// Walk an expression tree in pre-order (parent before children).
pub fn walk_expr<V: ExprVisitor>(expr: &Expr, visitor: &mut V) {
    walk_with_depth(expr, visitor, 0);
}

fn walk_with_depth<V: ExprVisitor>(expr: &Expr, visitor: &mut V, depth: usize) {
    // Expression trees are bounded by construction; this guard catches a
    // malformed tree before it overflows the stack.
    const MAX_DEPTH: usize = 1000;
    if depth > MAX_DEPTH {
        debug_assert!(
            false,
            "expression tree too deep (>{MAX_DEPTH} levels); traversal truncated"
        );
        return;
    }

    match expr {
        Expr::Const(c) => {
            visitor.visit_const(*c);
        }
        Expr::Var(v) => {
            visitor.visit_var(v);
        }
        Expr::Linear { coef, var } => {
            visitor.visit_linear(*coef, var);
        }
        Expr::Poly { var, .. } => {
            visitor.visit_poly(var);
        }
        Expr::Log { coef, var, base } => {
            visitor.visit_log(*coef, var, *base);
        }
        Expr::Exp { coef, base, var } => {
            visitor.visit_exp(*coef, *base, var);
        }
        Expr::Factorial { coef, var } => {
            visitor.visit_factorial(*coef, var);
        }
        Expr::PolyLog {
            degree,
            log_exp,
            var,
            ..
        } => {
            visitor.visit_poly_log(*degree, *log_exp, var);
        }
        Expr::Power { inner, exponent } => {
            if visitor.visit_power(inner, *exponent) {
                walk_with_depth(inner, visitor, depth + 1);
            }
        }
        Expr::LogOf { inner, base } => {
            if visitor.visit_log_of(inner, *base) {
                walk_with_depth(inner, visitor, depth + 1);
            }
        }
        Expr::ExpOf { base, inner } => {
            if visitor.visit_exp_of(*base, inner) {
                walk_with_depth(inner, visitor, depth + 1);
            }
        }
        Expr::FactorialOf { inner } => {
            if visitor.visit_factorial_of(inner) {
                walk_with_depth(inner, visitor, depth + 1);
            }
        }
        Expr::Binary { op, left, right } => {
            if visitor.visit_binary(*op, left, right) {
                walk_with_depth(left, visitor, depth + 1);
                walk_with_depth(right, visitor, depth + 1);
            }
        }
        Expr::Conditional {
            description,
            when_true,
            when_false,
        } => {
            if visitor.visit_conditional(description, when_true, when_false) {
                walk_with_depth(when_true, visitor, depth + 1);
                walk_with_depth(when_false, visitor, depth + 1);
            }
        }
        Expr::Parallel(par) => {
            if visitor.visit_parallel(par) {
                walk_with_depth(&par.work, visitor, depth + 1);
                walk_with_depth(&par.span, visitor, depth + 1);
                if let Some(sync) = &par.sync_overhead {
                    walk_with_depth(sync, visitor, depth + 1);
                }
            }
        }
        Expr::Probabilistic(prob) => {
            if visitor.visit_probabilistic(prob) {
                walk_with_depth(&prob.expected, visitor, depth + 1);
                walk_with_depth(&prob.worst, visitor, depth + 1);
                if let Some(best) = &prob.best {
                    walk_with_depth(best, visitor, depth + 1);
                }
            }
        }
        Expr::Recurrence(rec) => {
            if visitor.visit_recurrence(rec) {
                walk_with_depth(&rec.work, visitor, depth + 1);
            }
        }
        Expr::Integral {
            integrand,
            var,
            upper,
            ..
        } => {
            if visitor.visit_integral(integrand, var, upper) {
                walk_with_depth(integrand, visitor, depth + 1);
                walk_with_depth(upper, visitor, depth + 1);
            }
        }
        Expr::Special { kind, arg } => {
            if visitor.visit_special(*kind, arg) {
                walk_with_depth(arg, visitor, depth + 1);
            }
        }
    }
}

impl Expr {
    /// Double-dispatch entry point: walk this expression with `visitor`.
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) {
        walk_expr(self, visitor);
    }
}

/// A visitor that counts the nodes it sees.
#[derive(Default)]
pub struct NodeCounter {
    /// Number of nodes visited so far.
    pub count: usize,
}

impl ExprVisitor for NodeCounter {
    fn visit_const(&mut self, _value: f64) -> bool {
        self.count += 1;
        true
    }
    fn visit_var(&mut self, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_linear(&mut self, _coef: f64, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_poly(&mut self, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_log(&mut self, _coef: f64, _var: &Variable, _base: f64) -> bool {
        self.count += 1;
        true
    }
    fn visit_exp(&mut self, _coef: f64, _base: f64, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_factorial(&mut self, _coef: f64, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_poly_log(&mut self, _degree: f64, _log_exp: f64, _var: &Variable) -> bool {
        self.count += 1;
        true
    }
    fn visit_power(&mut self, _inner: &Expr, _exponent: f64) -> bool {
        self.count += 1;
        true
    }
    fn visit_log_of(&mut self, _inner: &Expr, _base: f64) -> bool {
        self.count += 1;
        true
    }
    fn visit_exp_of(&mut self, _base: f64, _inner: &Expr) -> bool {
        self.count += 1;
        true
    }
    fn visit_factorial_of(&mut self, _inner: &Expr) -> bool {
        self.count += 1;
        true
    }
    fn visit_binary(&mut self, _op: BinaryOp, _left: &Expr, _right: &Expr) -> bool {
        self.count += 1;
        true
    }
    fn visit_conditional(&mut self, _d: &str, _t: &Expr, _f: &Expr) -> bool {
        self.count += 1;
        true
    }
    fn visit_parallel(&mut self, _cost: &ParallelCost) -> bool {
        self.count += 1;
        true
    }
    fn visit_probabilistic(&mut self, _cost: &ProbabilisticCost) -> bool {
        self.count += 1;
        true
    }
    fn visit_recurrence(&mut self, _rec: &Recurrence) -> bool {
        self.count += 1;
        true
    }
    fn visit_integral(&mut self, _integrand: &Expr, _var: &Variable, _upper: &Expr) -> bool {
        self.count += 1;
        true
    }
    fn visit_special(&mut self, _kind: SpecialKind, _arg: &Expr) -> bool {
        self.count += 1;
        true
    }
}

/// A visitor that collects every variable it sees (free or structured).
#[derive(Default)]
pub struct VariableCollector {
    /// The variables found so far.
    pub variables: FxHashSet<Variable>,
}

impl ExprVisitor for VariableCollector {
    fn visit_var(&mut self, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_linear(&mut self, _coef: f64, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_poly(&mut self, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_log(&mut self, _coef: f64, var: &Variable, _base: f64) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_exp(&mut self, _coef: f64, _base: f64, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_factorial(&mut self, _coef: f64, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_poly_log(&mut self, _degree: f64, _log_exp: f64, var: &Variable) -> bool {
        self.variables.insert(var.clone());
        true
    }
    fn visit_recurrence(&mut self, rec: &Recurrence) -> bool {
        self.variables.insert(rec.variable.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_counter_matches_node_count() {
        let n = Variable::n();
        let e = Expr::plus(
            Expr::poly_log(1.0, 1.0, n.clone()),
            Expr::times(Expr::constant(2.0), Expr::var(n)),
        );
        let mut counter = NodeCounter::default();
        walk_expr(&e, &mut counter);
        assert_eq!(counter.count, e.node_count());
    }

    #[test]
    fn variable_collector_finds_structured_leaves() {
        let e = Expr::plus(
            Expr::log(1.0, Variable::m()),
            Expr::factorial(Variable::k()),
        );
        let mut collector = VariableCollector::default();
        walk_expr(&e, &mut collector);
        assert!(collector.variables.contains(&Variable::m()));
        assert!(collector.variables.contains(&Variable::k()));
        assert_eq!(collector.variables.len(), 2);
    }
}
