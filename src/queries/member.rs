use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath, validated_path};
use crate::finalized::FinalizedPredicate;
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};
use crate::value::PredicateValue;

use super::{BasicQuery, BooleanQuery, DateQuery, NumberQuery, SequenceQuery, StringQuery};

/// Query over a to-one relationship property holding a `U`.
///
/// Besides whole-object comparisons, a member query is a full accessor
/// surface: each field accessor validates the name against `U` and scopes
/// the resulting path under `<member>.`, so relationship chains compose by
/// repeated [`member`](Self::member) calls. The queries it hands out stay
/// typed to the root entity `T` and combine freely with the rest of the
/// compile scope.
pub struct MemberQuery<T: Reflectable, U: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entities: PhantomData<fn() -> (T, U)>,
}

impl<T: Reflectable, U: Reflectable> MemberQuery<T, U> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entities: PhantomData,
        }
    }

    /// Matches when the relationship points at `object`. Renders
    /// `<path> == %@` and binds the object's value representation.
    pub fn equals(&self, object: impl Into<PredicateValue>) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(
            &self.handle,
            format!("{} == %@", self.path),
            vec![object.into()],
        )
    }

    /// A `String` property of the member.
    pub fn string(&self, property: &str) -> StringQuery<T> {
        StringQuery::new(self.handle.clone(), self.child(property))
    }

    /// A numeric property of the member.
    pub fn number(&self, property: &str) -> NumberQuery<T> {
        NumberQuery::new(self.handle.clone(), self.child(property))
    }

    /// A date/time property of the member.
    pub fn date(&self, property: &str) -> DateQuery<T> {
        DateQuery::new(self.handle.clone(), self.child(property))
    }

    /// A boolean property of the member.
    pub fn boolean(&self, property: &str) -> BooleanQuery<T> {
        BooleanQuery::new(self.handle.clone(), self.child(property))
    }

    /// A collection property of the member.
    pub fn collection(&self, property: &str) -> SequenceQuery<T> {
        SequenceQuery::new(self.handle.clone(), self.child(property))
    }

    /// An untyped property of the member.
    pub fn any(&self, property: &str) -> BasicQuery<T> {
        BasicQuery::new(self.handle.clone(), self.child(property))
    }

    /// A member property of the member holding a `V`, one level deeper.
    pub fn member<V: Reflectable>(&self, property: &str) -> MemberQuery<T, V> {
        MemberQuery::new(self.handle.clone(), self.child(property))
    }

    fn child(&self, property: &str) -> KeyPath {
        validated_path::<U>(&self.handle, Some(&format!("{}.", self.path)), property)
    }
}

impl<T: Reflectable, U: Reflectable> Queryable for MemberQuery<T, U> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable, U: Reflectable> NilComparable for MemberQuery<T, U> {}
impl<T: Reflectable, U: Reflectable> Matchable for MemberQuery<T, U> {}
