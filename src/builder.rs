//! The shared expression-builder state and the fluent per-entity entry point.
//!
//! One [`BuilderCore`] exists per compile scope (one for the root compile,
//! one more for every nested subquery). It owns the in-progress expression
//! text and the ordered bound-argument list. Every field reference and
//! comparator produced inside a scope holds the same reference-counted
//! handle and mutates the same core, which is what lets a chain of
//! combinators supersede earlier fragments in place.
//!
//! A compile is one synchronous call stack; the core is `Rc<RefCell<_>>`
//! shared state, never touched concurrently.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::queries::{
    BasicQuery, BooleanQuery, DateQuery, MemberQuery, NumberQuery, SequenceQuery, StringQuery,
};
use crate::reflect::{FieldCache, Reflectable};
use crate::value::PredicateValue;

/// Identifies one compile scope (root or subquery).
///
/// Finalized predicates may only be combined with others from the same
/// scope; the id makes violations reportable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Allocate the next scope id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope {}", self.0)
    }
}

/// A property path in a predicate expression.
///
/// Paths are usually short (`title`, `bestFriend.title`,
/// `$CerberusItem.isHungry`), so they are stored inline where possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(SmolStr);

impl KeyPath {
    /// Create a key path from any string-like value.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(SmolStr::new(path.as_ref()))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// The mutable state of one compile scope.
#[derive(Debug, Default)]
pub(crate) struct BuilderCore {
    /// The in-progress expression text. Always either empty (no comparator
    /// has run yet) or a syntactically complete boolean expression.
    pub(crate) expression: String,
    /// Bound values, in placeholder order.
    pub(crate) arguments: Vec<PredicateValue>,
}

/// Opaque handle to one compile scope's shared state.
///
/// Cheap to clone; every query and finalized predicate in a scope holds
/// one. Not constructible outside the crate.
#[derive(Clone)]
pub struct BuilderHandle {
    pub(crate) core: Rc<RefCell<BuilderCore>>,
    pub(crate) scope: ScopeId,
    pub(crate) cache: Arc<FieldCache>,
    /// Item aliases of this scope and every enclosing subquery scope,
    /// outermost first. Consulted when synthesizing a fresh alias.
    pub(crate) aliases: SmallVec<[SmolStr; 2]>,
}

impl fmt::Debug for BuilderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderHandle")
            .field("scope", &self.scope)
            .field("expression", &self.core.borrow().expression)
            .finish()
    }
}

/// Validate a property name against `V` and produce its key path.
///
/// Unknown names warn and compile through unchanged; see [`crate::reflect`].
pub(crate) fn validated_path<V: Reflectable>(
    handle: &BuilderHandle,
    prefix: Option<&str>,
    property: &str,
) -> KeyPath {
    if V::VALIDATED && !handle.cache.contains::<V>(property) {
        tracing::warn!(
            entity = V::entity_name(),
            property,
            declared = ?handle.cache.properties_of::<V>(),
            "entity does not declare this property; compiling with the name as written \
             (value-type members may not be introspectable)"
        );
    }
    match prefix {
        Some(prefix) => KeyPath::new(format!("{prefix}{property}")),
        None => KeyPath::new(property),
    }
}

/// Synthesize an item alias for `entity`, unique against every enclosing
/// scope's alias. Sibling subqueries never clash (each `SUBQUERY(...)`
/// introduces its own variable), so only the enclosing chain is checked.
pub(crate) fn unique_item_alias(enclosing: &[SmolStr], entity: &str) -> SmolStr {
    let base = format!("${entity}Item");
    if !enclosing.iter().any(|alias| alias.as_str() == base) {
        return SmolStr::new(base);
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("${entity}Item{n}");
        if !enclosing.iter().any(|alias| alias.as_str() == candidate) {
            return SmolStr::new(candidate);
        }
        n += 1;
    }
}

/// The fluent entry point for describing filter conditions against `T`.
///
/// One builder is passed by reference into the compile callback; every
/// field accessor returns a typed query over one property, and every
/// terminal comparator on those queries writes into this builder's shared
/// core. See [`crate::Predicate::build`].
pub struct PredicateBuilder<T: Reflectable> {
    handle: BuilderHandle,
    /// Path prefix applied to every property in this scope (the item alias
    /// inside a subquery), including the trailing dot.
    prefix: Option<SmolStr>,
    /// What the scope's own object renders as: `SELF` at the root, the
    /// item alias inside a subquery.
    self_path: SmolStr,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> PredicateBuilder<T> {
    /// Root builder for a fresh compile.
    pub(crate) fn root(cache: Arc<FieldCache>) -> Self {
        Self {
            handle: BuilderHandle {
                core: Rc::new(RefCell::new(BuilderCore::default())),
                scope: ScopeId::next(),
                cache,
                aliases: SmallVec::new(),
            },
            prefix: None,
            self_path: SmolStr::new_static("SELF"),
            _entity: PhantomData,
        }
    }

    /// Builder for a subquery scope whose items render as `alias`.
    pub(crate) fn subquery_scope(
        cache: Arc<FieldCache>,
        aliases: SmallVec<[SmolStr; 2]>,
        alias: SmolStr,
    ) -> Self {
        Self {
            handle: BuilderHandle {
                core: Rc::new(RefCell::new(BuilderCore::default())),
                scope: ScopeId::next(),
                cache,
                aliases,
            },
            prefix: Some(SmolStr::new(format!("{alias}."))),
            self_path: alias,
            _entity: PhantomData,
        }
    }

    /// The object checked when the predicate runs: `SELF` at the root of a
    /// compile, the current item inside a subquery.
    pub fn this(&self) -> BasicQuery<T> {
        BasicQuery::new(self.handle.clone(), KeyPath::new(self.self_path.as_str()))
    }

    /// A `String` property of `T`.
    pub fn string(&self, property: &str) -> StringQuery<T> {
        StringQuery::new(self.handle.clone(), self.path(property))
    }

    /// A numeric property of `T`.
    pub fn number(&self, property: &str) -> NumberQuery<T> {
        NumberQuery::new(self.handle.clone(), self.path(property))
    }

    /// A date/time property of `T`.
    pub fn date(&self, property: &str) -> DateQuery<T> {
        DateQuery::new(self.handle.clone(), self.path(property))
    }

    /// A boolean property of `T`.
    pub fn boolean(&self, property: &str) -> BooleanQuery<T> {
        BooleanQuery::new(self.handle.clone(), self.path(property))
    }

    /// A collection property of `T`; the starting point for subqueries.
    pub fn collection(&self, property: &str) -> SequenceQuery<T> {
        SequenceQuery::new(self.handle.clone(), self.path(property))
    }

    /// A member property of `T` holding a `U`. The returned query is
    /// itself a full accessor surface scoped under `<property>.`, so
    /// relationship chains of any depth compose by repeated `member` calls.
    pub fn member<U: Reflectable>(&self, property: &str) -> MemberQuery<T, U> {
        MemberQuery::new(self.handle.clone(), self.path(property))
    }

    /// Read back the finished expression and arguments for this scope.
    pub(crate) fn harvest(&self) -> (String, Vec<PredicateValue>) {
        let core = self.handle.core.borrow();
        (core.expression.clone(), core.arguments.clone())
    }

    #[cfg(test)]
    pub(crate) fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn path(&self, property: &str) -> KeyPath {
        validated_path::<T>(&self.handle, self.prefix.as_deref(), property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_ids_are_unique() {
        let a = ScopeId::next();
        let b = ScopeId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_path_display() {
        let path = KeyPath::new("bestFriend.title");
        assert_eq!(path.to_string(), "bestFriend.title");
        assert_eq!(KeyPath::from("age").as_str(), "age");
    }

    #[test]
    fn test_unique_item_alias() {
        let none: [SmolStr; 0] = [];
        assert_eq!(unique_item_alias(&none, "Cerberus").as_str(), "$CerberusItem");

        let taken = [SmolStr::new("$CerberusItem")];
        assert_eq!(unique_item_alias(&taken, "Cerberus").as_str(), "$CerberusItem2");
        assert_eq!(unique_item_alias(&taken, "Elf").as_str(), "$ElfItem");

        let taken_twice = [SmolStr::new("$CerberusItem"), SmolStr::new("$CerberusItem2")];
        assert_eq!(
            unique_item_alias(&taken_twice, "Cerberus").as_str(),
            "$CerberusItem3"
        );
    }
}
