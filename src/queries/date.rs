use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use crate::builder::{BuilderHandle, KeyPath};
use crate::finalized::FinalizedPredicate;
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};
use crate::value::PredicateValue;

/// Query over a date/time property.
///
/// Timestamps bind as `%@` placeholders, same as numbers.
pub struct DateQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> DateQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }

    fn compare(&self, operator: &str, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(
            &self.handle,
            format!("{} {} %@", self.path, operator),
            vec![PredicateValue::DateTime(when)],
        )
    }

    /// Matches when the property equals `when` exactly.
    pub fn equals(&self, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        self.compare("==", when)
    }

    /// Matches when the property is strictly before `when`.
    pub fn is_earlier_than(&self, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        self.compare("<", when)
    }

    /// Matches when the property is strictly after `when`.
    pub fn is_later_than(&self, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        self.compare(">", when)
    }

    /// Matches when the property is before or exactly `when`.
    pub fn is_earlier_than_or_on(&self, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        self.compare("<=", when)
    }

    /// Matches when the property is after or exactly `when`.
    pub fn is_later_than_or_on(&self, when: DateTime<Utc>) -> FinalizedPredicate<T> {
        self.compare(">=", when)
    }
}

impl<T: Reflectable> Queryable for DateQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable> NilComparable for DateQuery<T> {}
impl<T: Reflectable> Matchable for DateQuery<T> {}
