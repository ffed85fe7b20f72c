//! Pre-recorded complexities for built-in container operations.
//!
//! A process-wide, read-only map keyed by `(container, operation)`.
//! Initialized eagerly on first use and never mutated afterwards, so
//! concurrent lookups need no synchronization beyond the one-time
//! publication `LazyLock` provides. Unknown pairs fall back to a
//! heuristic `O(n)` marked `Unknown`.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::core::expr::Expr;
use crate::core::source::{AttributedComplexity, ComplexitySource, SourceType};
use crate::core::variable::Variable;

type OperationKey = (&'static str, &'static str);

fn documented(expr: Expr) -> AttributedComplexity {
    AttributedComplexity::new(expr, ComplexitySource::of(SourceType::Documented))
}

fn documented_amortized(expr: Expr) -> AttributedComplexity {
    let mut source = ComplexitySource::of(SourceType::Documented);
    source.is_amortized = true;
    AttributedComplexity::new(expr, source)
}

static OPERATIONS: LazyLock<FxHashMap<OperationKey, AttributedComplexity>> = LazyLock::new(|| {
    let n = Variable::n;
    let constant = || Expr::constant(1.0);
    let linear = || Expr::var(n());
    let log = || Expr::log(1.0, n());
    let n_log_n = || Expr::poly_log(1.0, 1.0, n());

    let mut table: FxHashMap<OperationKey, AttributedComplexity> = FxHashMap::default();

    // Contiguous arrays.
    table.insert(("vec", "index"), documented(constant()));
    table.insert(("vec", "push"), documented_amortized(constant()));
    table.insert(("vec", "pop"), documented(constant()));
    table.insert(("vec", "insert"), documented(linear()));
    table.insert(("vec", "remove"), documented(linear()));
    table.insert(("vec", "contains"), documented(linear()));
    table.insert(("vec", "sort"), documented(n_log_n()));
    table.insert(("vec", "sort_unstable"), documented(n_log_n()));
    table.insert(("vec", "binary_search"), documented(log()));
    table.insert(("vec", "iter"), documented(linear()));

    // Hash-based maps and sets.
    table.insert(("hash_map", "get"), documented(constant()));
    table.insert(("hash_map", "insert"), documented_amortized(constant()));
    table.insert(("hash_map", "remove"), documented(constant()));
    table.insert(("hash_map", "contains_key"), documented(constant()));
    table.insert(("hash_map", "iter"), documented(linear()));
    table.insert(("hash_set", "insert"), documented_amortized(constant()));
    table.insert(("hash_set", "contains"), documented(constant()));
    table.insert(("hash_set", "remove"), documented(constant()));

    // Ordered maps and sets.
    table.insert(("btree_map", "get"), documented(log()));
    table.insert(("btree_map", "insert"), documented(log()));
    table.insert(("btree_map", "remove"), documented(log()));
    table.insert(("btree_map", "range"), documented(log()));
    table.insert(("btree_set", "insert"), documented(log()));
    table.insert(("btree_set", "contains"), documented(log()));

    // Binary heaps.
    table.insert(("binary_heap", "push"), documented_amortized(log()));
    table.insert(("binary_heap", "pop"), documented(log()));
    table.insert(("binary_heap", "peek"), documented(constant()));

    // Double-ended queues and linked lists.
    table.insert(("vec_deque", "push_back"), documented_amortized(constant()));
    table.insert(("vec_deque", "push_front"), documented_amortized(constant()));
    table.insert(("vec_deque", "pop_front"), documented(constant()));
    table.insert(("linked_list", "push_front"), documented(constant()));
    table.insert(("linked_list", "iter"), documented(linear()));

    // Strings.
    table.insert(("string", "push"), documented_amortized(constant()));
    table.insert(("string", "contains"), documented(linear()));
    table.insert(("string", "find"), documented(linear()));

    table
});

/// Look up the recorded complexity of `(container, operation)`.
///
/// Unknown pairs come back as a heuristic `O(n)` upper bound with
/// `Unknown` provenance, so callers always get something usable.
#[must_use]
pub fn builtin_operation(container: &str, operation: &str) -> AttributedComplexity {
    OPERATIONS
        .get(&(container, operation))
        .cloned()
        .unwrap_or_else(|| {
            let mut source = ComplexitySource::of(SourceType::Unknown);
            source.is_upper_bound = true;
            source.notes = Some(format!(
                "no recorded complexity for {container}::{operation}; assuming linear"
            ));
            AttributedComplexity::new(Expr::var(Variable::n()), source)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_lookups() {
        let sort = builtin_operation("vec", "sort");
        assert_eq!(sort.source.source_type, SourceType::Documented);
        assert_eq!(sort.expression.big_o(), "O(n * log(n))");

        let push = builtin_operation("vec", "push");
        assert!(push.source.is_amortized);
    }

    #[test]
    fn unknown_operations_fall_back_to_linear() {
        let fallback = builtin_operation("frobnicator", "frobnicate");
        assert_eq!(fallback.source.source_type, SourceType::Unknown);
        assert!(fallback.source.is_upper_bound);
        assert_eq!(fallback.expression.big_o(), "O(n)");
    }

    #[test]
    fn lookups_are_stable_across_calls() {
        let first = builtin_operation("btree_map", "get");
        let second = builtin_operation("btree_map", "get");
        assert_eq!(first, second);
    }
}
