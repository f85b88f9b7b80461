//! Capability mixins shared across field-kind queries.
//!
//! Each query type opts into exactly the comparison capabilities valid for
//! its field kind by implementing these traits; the default method bodies
//! carry the shared rendering logic. [`Queryable`] is the plumbing base
//! that exposes the scope handle and the property path being compared.

use crate::builder::{BuilderHandle, KeyPath};
use crate::finalized::FinalizedPredicate;
use crate::reflect::Reflectable;
use crate::value::PredicateValue;

/// Base capability: a query knows which scope it writes into and which
/// property path it compares.
pub trait Queryable {
    /// Entity type of the compile scope this query's results belong to.
    type Entity: Reflectable;

    #[doc(hidden)]
    fn handle(&self) -> &BuilderHandle;

    #[doc(hidden)]
    fn key_path(&self) -> &KeyPath;
}

/// Capability to compare a property against nil.
pub trait NilComparable: Queryable {
    /// Matches when the property is nil. Renders `<path> == nil` and binds
    /// no argument.
    fn equals_nil(&self) -> FinalizedPredicate<Self::Entity> {
        FinalizedPredicate::leaf(
            self.handle(),
            format!("{} == nil", self.key_path()),
            Vec::new(),
        )
    }
}

/// Capability to perform SQL-like `IN` comparisons.
pub trait Matchable: Queryable {
    /// Matches when the property equals any value in `values`.
    ///
    /// Renders `<path> IN %@` and binds the whole collection as one
    /// argument. The input is materialized immediately; lazy sources are
    /// consumed in full.
    fn matches_any_value_in<I>(&self, values: I) -> FinalizedPredicate<Self::Entity>
    where
        I: IntoIterator,
        I::Item: Into<PredicateValue>,
    {
        let list: Vec<PredicateValue> = values.into_iter().map(Into::into).collect();
        FinalizedPredicate::leaf(
            self.handle(),
            format!("{} IN %@", self.key_path()),
            vec![PredicateValue::List(list)],
        )
    }
}
