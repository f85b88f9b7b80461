//! The compiled predicate and the compile entry points.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::builder::PredicateBuilder;
use crate::reflect::{FieldCache, Reflectable};
use crate::value::PredicateValue;

/// The expression a compile produces when no comparator ran. Matches
/// nothing rather than everything, so a forgotten filter body fails
/// closed.
pub const ALWAYS_FALSE: &str = "FALSEPREDICATE";

/// A compiled predicate: a boolean expression string plus the bound
/// arguments its `%@` placeholders consume, in order.
///
/// Inert data with no ties to the builder that produced it; serializable
/// for storage or transport.
///
/// # Examples
///
/// ```rust
/// use predikit::{Predicate, StringOptions};
///
/// struct Show;
/// predikit::reflectable!(Show { title, rating });
///
/// let predicate = Predicate::build::<Show, _>(|q| {
///     let title = q.string("title").equals("Galactica", StringOptions::NONE);
///     let rating = q.number("rating").is_greater_than(8);
///     title.and(&rating);
/// });
///
/// assert_eq!(predicate.expression(), r#"(title == "Galactica" && rating > %@)"#);
/// assert_eq!(predicate.arguments().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    expression: String,
    arguments: Vec<PredicateValue>,
}

impl Predicate {
    /// Compile a predicate against entity `T`.
    ///
    /// The callback receives a fresh builder; whatever expression is
    /// staged in the builder when the callback returns becomes the
    /// result. A callback that stages nothing compiles to
    /// [`ALWAYS_FALSE`].
    ///
    /// Uses a throwaway [`FieldCache`]; callers compiling many predicates
    /// should hold a cache and use [`build_with_cache`](Self::build_with_cache).
    pub fn build<T, F>(build: F) -> Self
    where
        T: Reflectable,
        F: FnOnce(&PredicateBuilder<T>),
    {
        Self::build_with_cache(&Arc::new(FieldCache::new()), build)
    }

    /// Compile a predicate against entity `T`, reusing `cache` for
    /// property-name validation.
    pub fn build_with_cache<T, F>(cache: &Arc<FieldCache>, build: F) -> Self
    where
        T: Reflectable,
        F: FnOnce(&PredicateBuilder<T>),
    {
        let builder = PredicateBuilder::<T>::root(Arc::clone(cache));
        build(&builder);
        let (expression, arguments) = builder.harvest();

        if expression.is_empty() {
            tracing::debug!(
                entity = T::entity_name(),
                "compile staged no comparison; emitting the never-matching constant"
            );
            return Self {
                expression: ALWAYS_FALSE.to_string(),
                arguments: Vec::new(),
            };
        }

        tracing::debug!(
            entity = T::entity_name(),
            expression = %expression,
            arguments = arguments.len(),
            "compiled predicate"
        );
        Self {
            expression,
            arguments,
        }
    }

    /// The boolean expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The bound values, in placeholder order.
    pub fn arguments(&self) -> &[PredicateValue] {
        &self.arguments
    }

    /// Whether this predicate is the never-matching constant.
    pub fn is_always_false(&self) -> bool {
        self.expression == ALWAYS_FALSE
    }

    /// Decompose into the expression and argument list.
    pub fn into_parts(self) -> (String, Vec<PredicateValue>) {
        (self.expression, self.arguments)
    }
}
