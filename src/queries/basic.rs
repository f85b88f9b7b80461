use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath};
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};

/// Query over an untyped or self-referential path.
///
/// Returned by [`PredicateBuilder::this`](crate::PredicateBuilder::this);
/// offers only the kind-agnostic comparisons (nil and `IN`).
pub struct BasicQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> BasicQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }
}

impl<T: Reflectable> Queryable for BasicQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable> NilComparable for BasicQuery<T> {}
impl<T: Reflectable> Matchable for BasicQuery<T> {}
