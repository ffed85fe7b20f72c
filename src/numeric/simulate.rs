//! Direct numeric unrolling of recurrences.
//!
//! The refinement layer certifies closed forms against ground truth; the
//! ground truth comes from here. Divide-and-conquer recurrences are
//! unrolled with memoization on the floored argument; subtractive ones
//! iterate bottom-up. Both are bounded: table growth and argument size
//! are capped so a hostile recurrence cannot eat the process.

use rustc_hash::FxHashMap;
use std::collections::HashMap;

use crate::recurrence::{LinearRecurrence, Recurrence};

/// Largest argument the simulators accept.
const MAX_ARGUMENT: f64 = 68_719_476_736.0; // 2^36
/// Memo-table entry cap for divide-and-conquer unrolling.
const MAX_TABLE: usize = 1 << 22;
/// Step cap for bottom-up linear unrolling.
const MAX_STEPS: usize = 1 << 22;

/// Numerically unroll `T(n) = Σᵢ aᵢ·T(bᵢ·n) + f(n)` down to `T(x ≤ 1) =
/// base`.
///
/// Returns `None` when the recurrence is malformed (a scale factor
/// outside `(0, 1)`), when `f` cannot be evaluated, or when the memo
/// table outgrows its bound.
#[must_use]
pub fn simulate_divide_and_conquer(rec: &Recurrence, n: f64) -> Option<f64> {
    if !(1.0..=MAX_ARGUMENT).contains(&n) {
        return None;
    }
    for term in &rec.terms {
        if term.coefficient <= 0.0 || term.scale <= 0.0 || term.scale >= 1.0 {
            return None;
        }
    }
    let mut memo: FxHashMap<u64, f64> = FxHashMap::default();
    unroll(rec, n, &mut memo)
}

fn unroll(rec: &Recurrence, n: f64, memo: &mut FxHashMap<u64, f64>) -> Option<f64> {
    if n <= 1.0 {
        return Some(rec.base_case);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "n is bounded")]
    let key = n.floor() as u64;
    if let Some(&cached) = memo.get(&key) {
        return Some(cached);
    }
    if memo.len() >= MAX_TABLE {
        return None;
    }

    let mut binding = HashMap::new();
    binding.insert(rec.variable.name(), n);
    let mut total = rec.work.evaluate(&binding)?;

    for term in &rec.terms {
        let child = unroll(rec, (term.scale * n).floor(), memo)?;
        total += term.coefficient * child;
    }
    if !total.is_finite() {
        return None;
    }
    memo.insert(key, total);
    Some(total)
}

/// Numerically unroll `T(n) = Σᵢ cᵢ·T(n−i) + f(n)` bottom-up, with
/// `T(x ≤ 0) = 0` and `T(1..=k) = base`.
///
/// Returns `None` for an order-zero recurrence, an unevaluable `f`, an
/// overflowing value, or an argument beyond the step cap.
#[must_use]
pub fn simulate_linear(rec: &LinearRecurrence, n: usize) -> Option<f64> {
    let order = rec.order();
    if order == 0 || n > MAX_STEPS {
        return None;
    }
    if n == 0 {
        return Some(0.0);
    }

    let mut values: Vec<f64> = Vec::with_capacity(n + 1);
    values.push(0.0); // T(0)
    let mut binding = HashMap::new();
    for i in 1..=n {
        let value = if i <= order {
            rec.base_case
        } else {
            #[allow(clippy::cast_precision_loss, reason = "i is far below 2^53")]
            let x = i as f64;
            binding.insert(rec.variable.name(), x);
            let mut total = rec.work.evaluate(&binding)?;
            for (offset, &coef) in rec.coefficients.iter().enumerate() {
                if coef.abs() > 0.0 {
                    total += coef * values[i - offset - 1];
                }
            }
            total
        };
        if !value.is_finite() {
            return None;
        }
        values.push(value);
    }
    values.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expr::Expr;
    use crate::core::variable::Variable;
    use crate::recurrence::RecurrenceTerm;

    #[test]
    fn merge_sort_simulation_grows_like_n_log_n() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 0.5, &n)],
            n.clone(),
            Expr::linear(1.0, n),
        );
        let t1024 = simulate_divide_and_conquer(&rec, 1024.0).unwrap();
        // T(1024) = 1024·10 + 1024·T(1) terms; within a factor of 2 of n·log n
        assert!(t1024 > 10_240.0 * 0.5 && t1024 < 10_240.0 * 2.0, "{t1024}");
    }

    #[test]
    fn arithmetic_sum_simulation() {
        // T(n) = T(n-1) + n = n(n+1)/2 - ish
        let n = Variable::n();
        let rec = LinearRecurrence::new(vec![1.0], n.clone(), Expr::linear(1.0, n));
        let t100 = simulate_linear(&rec, 100).unwrap();
        assert!((t100 - 5049.0).abs() < 100.0, "{t100}");
    }

    #[test]
    fn fibonacci_simulation() {
        let n = Variable::n();
        let rec = LinearRecurrence::new(vec![1.0, 1.0], n, Expr::constant(0.0))
            .with_base_case(1.0);
        let t10 = simulate_linear(&rec, 10).unwrap();
        // T(1) = T(2) = 1, then Fibonacci: T(10) = 55
        assert!((t10 - 55.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_scales() {
        let n = Variable::n();
        let rec = Recurrence::new(
            vec![RecurrenceTerm::scaled(2.0, 1.5, &n)],
            n.clone(),
            Expr::var(n),
        );
        assert_eq!(simulate_divide_and_conquer(&rec, 64.0), None);
    }
}
