use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath};
use crate::finalized::FinalizedPredicate;
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};
use crate::value::PredicateValue;

/// Query over a numeric property.
///
/// Numeric operands are never embedded in the expression text; every
/// comparator renders a `%@` placeholder and binds the value.
pub struct NumberQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> NumberQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }

    fn compare(&self, operator: &str, value: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(
            &self.handle,
            format!("{} {} %@", self.path, operator),
            vec![value.into()],
        )
    }

    /// Matches when the property equals `value`.
    pub fn equals(&self, value: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        self.compare("==", value)
    }

    /// Matches when the property does not equal `value`.
    pub fn does_not_equal(&self, value: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        self.compare("!=", value)
    }

    /// Matches when the property is greater than `value`.
    pub fn is_greater_than(&self, value: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        self.compare(">", value)
    }

    /// Matches when the property is less than `value`.
    pub fn is_less_than(&self, value: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        self.compare("<", value)
    }

    /// Matches when the property is greater than or equal to `value`.
    pub fn is_greater_than_or_equal_to(
        &self,
        value: impl Into<PredicateValue>,
    ) -> FinalizedPredicate<T> {
        self.compare(">=", value)
    }

    /// Matches when the property is less than or equal to `value`.
    pub fn is_less_than_or_equal_to(
        &self,
        value: impl Into<PredicateValue>,
    ) -> FinalizedPredicate<T> {
        self.compare("<=", value)
    }
}

impl<T: Reflectable> Queryable for NumberQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable> NilComparable for NumberQuery<T> {}
impl<T: Reflectable> Matchable for NumberQuery<T> {}
