//! Structural analysis: free variables, substitution, size metrics.

use rustc_hash::FxHashSet;

use super::Expr;
use crate::core::variable::Variable;
use crate::recurrence::{Recurrence, RecurrenceTerm};

impl Expr {
    /// Collect every free variable in the expression.
    ///
    /// The integration variable of an [`Expr::Integral`] is bound inside
    /// its integrand and does not appear in the result.
    #[must_use]
    pub fn free_variables(&self) -> FxHashSet<Variable> {
        let mut vars = FxHashSet::default();
        self.collect_free(&mut vars);
        vars
    }

    fn collect_free(&self, vars: &mut FxHashSet<Variable>) {
        match self {
            Self::Const(_) => {}
            Self::Var(v)
            | Self::Linear { var: v, .. }
            | Self::Poly { var: v, .. }
            | Self::Log { var: v, .. }
            | Self::Exp { var: v, .. }
            | Self::Factorial { var: v, .. }
            | Self::PolyLog { var: v, .. } => {
                vars.insert(v.clone());
            }
            Self::Power { inner, .. }
            | Self::LogOf { inner, .. }
            | Self::ExpOf { inner, .. }
            | Self::FactorialOf { inner } => inner.collect_free(vars),
            Self::Binary { left, right, .. } => {
                left.collect_free(vars);
                right.collect_free(vars);
            }
            Self::Conditional {
                when_true,
                when_false,
                ..
            } => {
                when_true.collect_free(vars);
                when_false.collect_free(vars);
            }
            Self::Parallel(par) => {
                par.work.collect_free(vars);
                par.span.collect_free(vars);
                if let Some(p) = &par.processors {
                    vars.insert(p.clone());
                }
                if let Some(sync) = &par.sync_overhead {
                    sync.collect_free(vars);
                }
            }
            Self::Probabilistic(prob) => {
                prob.expected.collect_free(vars);
                prob.worst.collect_free(vars);
                if let Some(best) = &prob.best {
                    best.collect_free(vars);
                }
            }
            Self::Recurrence(rec) => {
                vars.insert(rec.variable.clone());
                rec.work.collect_free(vars);
            }
            Self::Integral {
                integrand,
                var,
                upper,
                ..
            } => {
                let mut inner = FxHashSet::default();
                integrand.collect_free(&mut inner);
                inner.remove(var);
                vars.extend(inner);
                upper.collect_free(vars);
            }
            Self::Special { arg, .. } => arg.collect_free(vars),
        }
    }

    /// Whether `var` occurs free in the expression.
    #[must_use]
    pub fn contains_var(&self, var: &Variable) -> bool {
        self.free_variables().contains(var)
    }

    /// Substitute `var` with `replacement`, returning a fresh expression.
    ///
    /// Structured leaves keep their shape when the replacement is itself a
    /// variable; otherwise they expand into the equivalent wrapper forms
    /// (`Linear(a, v)` becomes `a · replacement`, and so on). A
    /// substitution that changes nothing returns an equal value.
    #[must_use]
    pub fn substitute(&self, var: &Variable, replacement: &Self) -> Self {
        match self {
            Self::Const(_) => self.clone(),
            Self::Var(v) => {
                if v == var {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            Self::Linear { coef, var: v } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::linear(*coef, w.clone()),
                    other => Self::times(Self::constant(*coef), other.clone()),
                }
            }
            Self::Poly { coeffs, var: v } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::Poly {
                        coeffs: coeffs.clone(),
                        var: w.clone(),
                    },
                    other => {
                        // Expand Σ c_d · repl^d, highest degree first.
                        let mut acc: Option<Self> = None;
                        for (&degree, &coef) in coeffs.iter().rev() {
                            let term = if degree == 0 {
                                Self::constant(coef)
                            } else {
                                Self::times(
                                    Self::constant(coef),
                                    Self::power(other.clone(), f64::from(degree)),
                                )
                            };
                            acc = Some(match acc {
                                Some(sum) => Self::plus(sum, term),
                                None => term,
                            });
                        }
                        acc.unwrap_or_else(|| Self::constant(0.0))
                    }
                }
            }
            Self::Log { coef, var: v, base } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::log_base(*coef, w.clone(), *base),
                    other => Self::times(
                        Self::constant(*coef),
                        Self::log_of(other.clone(), *base),
                    ),
                }
            }
            Self::Exp { coef, base, var: v } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::Exp {
                        coef: *coef,
                        base: *base,
                        var: w.clone(),
                    },
                    other => Self::times(
                        Self::constant(*coef),
                        Self::exp_of(*base, other.clone()),
                    ),
                }
            }
            Self::Factorial { coef, var: v } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::Factorial {
                        coef: *coef,
                        var: w.clone(),
                    },
                    other => Self::times(
                        Self::constant(*coef),
                        Self::factorial_of(other.clone()),
                    ),
                }
            }
            Self::PolyLog {
                coef,
                degree,
                log_exp,
                var: v,
                base,
            } => {
                if v != var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => Self::poly_log_full(*coef, *degree, *log_exp, w.clone(), *base),
                    other => {
                        let poly_part = Self::power(other.clone(), *degree);
                        let log_part =
                            Self::power(Self::log_of(other.clone(), *base), *log_exp);
                        Self::times(
                            Self::constant(*coef),
                            Self::times(poly_part, log_part),
                        )
                    }
                }
            }
            Self::Power { inner, exponent } => {
                Self::power(inner.substitute(var, replacement), *exponent)
            }
            Self::LogOf { inner, base } => {
                Self::log_of(inner.substitute(var, replacement), *base)
            }
            Self::ExpOf { base, inner } => {
                Self::exp_of(*base, inner.substitute(var, replacement))
            }
            Self::FactorialOf { inner } => {
                Self::factorial_of(inner.substitute(var, replacement))
            }
            Self::Binary { op, left, right } => Self::binary(
                *op,
                left.substitute(var, replacement),
                right.substitute(var, replacement),
            ),
            Self::Conditional {
                description,
                when_true,
                when_false,
            } => Self::conditional(
                description,
                when_true.substitute(var, replacement),
                when_false.substitute(var, replacement),
            ),
            Self::Parallel(par) => {
                let mut out = par.clone();
                out.work = out.work.substitute(var, replacement).into();
                out.span = out.span.substitute(var, replacement).into();
                if let Some(sync) = &par.sync_overhead {
                    out.sync_overhead = Some(sync.substitute(var, replacement).into());
                }
                Self::Parallel(out)
            }
            Self::Probabilistic(prob) => {
                let mut out = prob.clone();
                out.expected = out.expected.substitute(var, replacement).into();
                out.worst = out.worst.substitute(var, replacement).into();
                if let Some(best) = &prob.best {
                    out.best = Some(best.substitute(var, replacement).into());
                }
                Self::Probabilistic(out)
            }
            Self::Recurrence(rec) => {
                // A recurrence can only be renamed, not scaled.
                if rec.variable != *var {
                    return self.clone();
                }
                match replacement {
                    Self::Var(w) => {
                        let terms = rec
                            .terms
                            .iter()
                            .map(|t| {
                                if t.is_shifted() {
                                    RecurrenceTerm::shifted(t.coefficient, t.shift, w)
                                } else {
                                    RecurrenceTerm::scaled(t.coefficient, t.scale, w)
                                }
                            })
                            .collect();
                        let renamed = Recurrence::new(
                            terms,
                            w.clone(),
                            rec.work.substitute(var, replacement),
                        )
                        .with_base_case(rec.base_case);
                        Self::recurrence(renamed)
                    }
                    _ => self.clone(),
                }
            }
            Self::Integral {
                integrand,
                var: bound,
                lower,
                upper,
                bound: asym,
            } => {
                // The integration variable is bound; only substitute past it.
                let new_integrand = if bound == var {
                    integrand.as_ref().clone()
                } else {
                    integrand.substitute(var, replacement)
                };
                let mut out = Self::integral(
                    new_integrand,
                    bound.clone(),
                    *lower,
                    upper.substitute(var, replacement),
                );
                if let (Self::Integral { bound: slot, .. }, Some(b)) = (&mut out, asym) {
                    *slot = Some(b.substitute(var, replacement).into());
                }
                out
            }
            Self::Special { kind, arg } => {
                Self::special(*kind, arg.substitute(var, replacement))
            }
        }
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Const(_)
            | Self::Var(_)
            | Self::Linear { .. }
            | Self::Poly { .. }
            | Self::Log { .. }
            | Self::Exp { .. }
            | Self::Factorial { .. }
            | Self::PolyLog { .. } => 1,
            Self::Power { inner, .. }
            | Self::LogOf { inner, .. }
            | Self::ExpOf { inner, .. }
            | Self::FactorialOf { inner } => 1 + inner.node_count(),
            Self::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Self::Conditional {
                when_true,
                when_false,
                ..
            } => 1 + when_true.node_count() + when_false.node_count(),
            Self::Parallel(par) => {
                1 + par.work.node_count()
                    + par.span.node_count()
                    + par.sync_overhead.as_ref().map_or(0, |s| s.node_count())
            }
            Self::Probabilistic(prob) => {
                1 + prob.expected.node_count()
                    + prob.worst.node_count()
                    + prob.best.as_ref().map_or(0, |b| b.node_count())
            }
            Self::Recurrence(rec) => 1 + rec.work.node_count(),
            Self::Integral {
                integrand, upper, ..
            } => 1 + integrand.node_count() + upper.node_count(),
            Self::Special { arg, .. } => 1 + arg.node_count(),
        }
    }

    /// Maximum nesting depth of the tree.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        match self {
            Self::Const(_)
            | Self::Var(_)
            | Self::Linear { .. }
            | Self::Poly { .. }
            | Self::Log { .. }
            | Self::Exp { .. }
            | Self::Factorial { .. }
            | Self::PolyLog { .. } => 1,
            Self::Power { inner, .. }
            | Self::LogOf { inner, .. }
            | Self::ExpOf { inner, .. }
            | Self::FactorialOf { inner } => 1 + inner.max_depth(),
            Self::Binary { left, right, .. } => 1 + left.max_depth().max(right.max_depth()),
            Self::Conditional {
                when_true,
                when_false,
                ..
            } => 1 + when_true.max_depth().max(when_false.max_depth()),
            Self::Parallel(par) => 1 + par.work.max_depth().max(par.span.max_depth()),
            Self::Probabilistic(prob) => {
                1 + prob.expected.max_depth().max(prob.worst.max_depth())
            }
            Self::Recurrence(rec) => 1 + rec.work.max_depth(),
            Self::Integral {
                integrand, upper, ..
            } => 1 + integrand.max_depth().max(upper.max_depth()),
            Self::Special { arg, .. } => 1 + arg.max_depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_variables_union_of_children() {
        let n = Variable::n();
        let m = Variable::m();
        let e = Expr::plus(Expr::var(n.clone()), Expr::log(1.0, m.clone()));
        let vars = e.free_variables();
        assert!(vars.contains(&n));
        assert!(vars.contains(&m));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn integral_binds_its_variable() {
        let n = Variable::n();
        let u = Variable::new("u", crate::core::variable::VarKind::Custom);
        let e = Expr::integral(
            Expr::power(Expr::var(u.clone()), -1.0),
            u.clone(),
            1.0,
            Expr::var(n.clone()),
        );
        let vars = e.free_variables();
        assert!(vars.contains(&n));
        assert!(!vars.contains(&u));
    }

    #[test]
    fn substitute_identity_on_missing_variable() {
        let n = Variable::n();
        let m = Variable::m();
        let e = Expr::poly_log(1.0, 1.0, n);
        let replaced = e.substitute(&m, &Expr::constant(7.0));
        assert_eq!(e, replaced);
    }

    #[test]
    fn substitute_variable_rename_keeps_shape() {
        let n = Variable::n();
        let m = Variable::m();
        let e = Expr::linear(3.0, n.clone());
        let renamed = e.substitute(&n, &Expr::var(m.clone()));
        assert_eq!(renamed, Expr::linear(3.0, m));
    }

    #[test]
    fn substitute_expands_structured_leaf() {
        let n = Variable::n();
        let e = Expr::linear(3.0, n.clone());
        let replaced = e.substitute(&n, &Expr::constant(10.0));
        assert_eq!(
            replaced,
            Expr::times(Expr::constant(3.0), Expr::constant(10.0))
        );
    }

    #[test]
    fn node_count_counts_all_nodes() {
        let n = Variable::n();
        let e = Expr::plus(Expr::var(n.clone()), Expr::times(Expr::constant(2.0), Expr::var(n)));
        assert_eq!(e.node_count(), 5);
        assert_eq!(e.max_depth(), 3);
    }
}
