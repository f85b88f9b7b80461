use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath};
use crate::finalized::FinalizedPredicate;
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};

/// Query over a boolean property.
///
/// Boolean literals are embedded in the expression text, never bound.
pub struct BooleanQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> BooleanQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }

    /// Matches when the property is true.
    pub fn is_true(&self) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(&self.handle, format!("{} == true", self.path), Vec::new())
    }

    /// Matches when the property is false.
    pub fn is_false(&self) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(&self.handle, format!("{} == false", self.path), Vec::new())
    }
}

impl<T: Reflectable> Queryable for BooleanQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable> NilComparable for BooleanQuery<T> {}
impl<T: Reflectable> Matchable for BooleanQuery<T> {}
