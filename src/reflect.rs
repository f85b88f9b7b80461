//! Entity reflection: property listings and best-effort name validation.
//!
//! The builder checks every requested property name against the entity's
//! declared property list so that typos surface immediately instead of at
//! query-execution time. Validation is advisory: value-type members and
//! dynamically declared schema fields may not be introspectable, so an
//! unknown name logs a `tracing::warn!` and compilation continues with the
//! name as written.
//!
//! Reflected property sets are cached per entity type name in a
//! [`FieldCache`]. The cache is an explicit object with an explicit
//! lifecycle: [`crate::Predicate::build`] creates a throwaway one per
//! compile, while applications that compile many predicates should own a
//! single cache and pass it to [`crate::Predicate::build_with_cache`].
//!
//! # Examples
//!
//! ```rust
//! use predikit::{FieldCache, Reflectable};
//!
//! struct Show;
//! predikit::reflectable!(Show { title, rating });
//!
//! let cache = FieldCache::new();
//! assert!(cache.contains::<Show>("title"));
//! assert!(!cache.contains::<Show>("tittle"));
//! assert_eq!(cache.entity_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

/// Declares the queryable property names of an entity type.
///
/// Implement this for each marker type you build predicates against,
/// usually through the [`reflectable!`](crate::reflectable) macro.
pub trait Reflectable {
    /// Whether unknown-property warnings apply to this entity.
    ///
    /// The untyped escape hatch ([`AnyEntity`]) opts out.
    const VALIDATED: bool = true;

    /// The entity's name, used in item aliases and diagnostics.
    fn entity_name() -> &'static str;

    /// The entity's property names.
    fn properties() -> Vec<&'static str>;
}

/// Untyped escape hatch for predicates over entities with no declared
/// property list. Skips all property-name validation.
pub struct AnyEntity;

impl Reflectable for AnyEntity {
    const VALIDATED: bool = false;

    fn entity_name() -> &'static str {
        "AnyEntity"
    }

    fn properties() -> Vec<&'static str> {
        Vec::new()
    }
}

/// Cache of reflected property sets, keyed by entity type name.
///
/// Thread-safe so one cache can serve compiles on multiple threads, even
/// though each individual compile is single-threaded.
pub struct FieldCache {
    entries: RwLock<HashMap<&'static str, Arc<IndexSet<&'static str>>>>,
}

impl FieldCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The property set of `T`, reflecting and caching it on first use.
    pub fn properties_of<T: Reflectable>(&self) -> Arc<IndexSet<&'static str>> {
        if let Some(set) = self.entries.read().get(T::entity_name()) {
            return Arc::clone(set);
        }
        let set: Arc<IndexSet<&'static str>> = Arc::new(T::properties().into_iter().collect());
        Arc::clone(
            self.entries
                .write()
                .entry(T::entity_name())
                .or_insert(set),
        )
    }

    /// Whether `T` declares a property named `property`.
    pub fn contains<T: Reflectable>(&self, property: &str) -> bool {
        self.properties_of::<T>().contains(property)
    }

    /// Number of entity types cached so far.
    pub fn entity_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Drop all cached property sets.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::new()
    }
}
