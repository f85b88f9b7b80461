use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath, PredicateBuilder, unique_item_alias};
use crate::finalized::FinalizedPredicate;
use crate::predicate::ALWAYS_FALSE;
use crate::reflect::Reflectable;
use crate::subquery::SubqueryMatch;
use crate::traits::Queryable;

/// Strip one grouping paren pair that wraps the entire expression.
///
/// Combined expressions render as `(a && b)`; embedded as a subquery's
/// inner predicate the outer pair is redundant. Only a pair that balances
/// exactly at the final character is stripped, so `(a) && (b)` and leaf
/// fragments pass through unchanged. Quotes in string operands are already
/// escaped and contain no parens that alter nesting depth.
fn strip_outer_group(expression: String) -> String {
    let bytes = expression.as_bytes();
    if bytes.first() != Some(&b'(') || bytes.last() != Some(&b')') {
        return expression;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                // The opening paren closes before the end: not a wrapper.
                if depth == 0 && i != bytes.len() - 1 {
                    return expression;
                }
            }
            _ => {}
        }
    }
    expression[1..expression.len() - 1].to_string()
}

/// Query over a collection property.
///
/// Collections support only emptiness checks and subqueries; per-item
/// comparisons happen inside the subquery's inner predicate.
pub struct SequenceQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> SequenceQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }

    /// Matches when the collection has no items. Renders
    /// `<path>.@count == 0` with no bound argument.
    pub fn is_empty(&self) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(
            &self.handle,
            format!("{}.@count == 0", self.path),
            Vec::new(),
        )
    }

    /// Matches against an aggregate over the items of type `U` that
    /// satisfy an inner predicate.
    ///
    /// `build` receives a fresh builder whose properties render under a
    /// synthesized item alias (`$<U>Item`, numbered when a nesting level
    /// already uses that alias) and returns the aggregate condition the
    /// matching items must satisfy. Renders
    /// `SUBQUERY(<path>, <alias>, <inner>).<aggregate>`; an empty inner
    /// predicate collapses to the never-matching constant.
    ///
    /// The inner scope is independent: its finalized predicates cannot be
    /// combined with the outer scope's.
    pub fn subquery<U, F>(&self, build: F) -> FinalizedPredicate<T>
    where
        U: Reflectable,
        F: FnOnce(&PredicateBuilder<U>) -> SubqueryMatch,
    {
        let alias = unique_item_alias(&self.handle.aliases, U::entity_name());
        let mut aliases = self.handle.aliases.clone();
        aliases.push(alias.clone());

        let inner_builder =
            PredicateBuilder::<U>::subquery_scope(self.handle.cache.clone(), aliases, alias.clone());
        let aggregate = build(&inner_builder);
        let (inner, inner_arguments) = inner_builder.harvest();

        if inner.is_empty() {
            tracing::debug!(
                collection = %self.path,
                "subquery callback produced no comparison; emitting the never-matching constant"
            );
            return FinalizedPredicate::leaf(&self.handle, ALWAYS_FALSE.to_string(), Vec::new());
        }

        let inner = strip_outer_group(inner);
        FinalizedPredicate::leaf(
            &self.handle,
            format!("SUBQUERY({}, {}, {}).{}", self.path, alias, inner, aggregate.render()),
            inner_arguments,
        )
    }
}

impl<T: Reflectable> Queryable for SequenceQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}
