//! # PrediKit
//!
//! A fluent, type-safe builder for predicate expression strings.
//!
//! PrediKit compiles a chain of typed per-field comparisons into a boolean
//! expression string plus an ordered list of bound arguments, ready to hand
//! to whatever query layer consumes `%@`-placeholder predicates. Field
//! accessors are typed by kind, so a string field only offers string
//! comparators and a date field only offers date comparators, and property
//! names are validated against the entity's declared property list at
//! build time.
//!
//! ## Quick Start
//!
//! ```rust
//! use predikit::{Predicate, StringOptions};
//!
//! struct Show;
//! predikit::reflectable!(Show { title, rating, network });
//!
//! let predicate = Predicate::build::<Show, _>(|q| {
//!     let title = q.string("title").equals("Galactica", StringOptions::NONE);
//!     let rating = q.number("rating").is_greater_than(8);
//!     title.and(&rating);
//! });
//!
//! assert_eq!(
//!     predicate.expression(),
//!     r#"(title == "Galactica" && rating > %@)"#
//! );
//! assert_eq!(predicate.arguments().len(), 1);
//! ```
//!
//! ## Combining Conditions
//!
//! [`and`](FinalizedPredicate::and) / [`or`](FinalizedPredicate::or) chains
//! of one operator stay flat; switching operators introduces a nesting
//! boundary:
//!
//! ```rust
//! use predikit::{Predicate, StringOptions};
//!
//! struct Show;
//! predikit::reflectable!(Show { title, rating, network });
//!
//! let predicate = Predicate::build::<Show, _>(|q| {
//!     let cable = q.string("network").equals("HBO", StringOptions::NONE);
//!     let rated = q.number("rating").is_greater_than(8);
//!     let classic = q.number("rating").equals(10);
//!     cable.and(&rated).or(&classic);
//! });
//!
//! assert_eq!(
//!     predicate.expression(),
//!     r#"((network == "HBO" && rating > %@) || rating == %@)"#
//! );
//! ```
//!
//! ## Subqueries
//!
//! Collection properties aggregate over a nested entity with `SUBQUERY`:
//!
//! ```rust
//! use predikit::{Predicate, SubqueryMatch};
//!
//! struct Show;
//! predikit::reflectable!(Show { title, episodes });
//! struct Episode;
//! predikit::reflectable!(Episode { isAired });
//!
//! let predicate = Predicate::build::<Show, _>(|q| {
//!     q.collection("episodes").subquery::<Episode, _>(|episode| {
//!         episode.boolean("isAired").is_false();
//!         SubqueryMatch::none()
//!     });
//! });
//!
//! assert_eq!(
//!     predicate.expression(),
//!     "SUBQUERY(episodes, $EpisodeItem, $EpisodeItem.isAired == false).@count == 0"
//! );
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`]; set `PREDIKIT_DEBUG=true` and call
//! [`logging::init`] (requires the `tracing-subscriber` feature), or
//! install your own subscriber.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[macro_use]
pub mod macros;

mod builder;
mod error;
mod finalized;
pub mod logging;
mod options;
mod predicate;
mod queries;
mod reflect;
mod subquery;
mod traits;
mod value;

pub use builder::{BuilderHandle, KeyPath, PredicateBuilder, ScopeId};
pub use error::{PredicateError, PredicateResult};
pub use finalized::FinalizedPredicate;
pub use options::StringOptions;
pub use predicate::{ALWAYS_FALSE, Predicate};
pub use queries::{
    BasicQuery, BooleanQuery, DateQuery, MemberQuery, NumberQuery, SequenceQuery, StringQuery,
};
pub use reflect::{AnyEntity, FieldCache, Reflectable};
pub use subquery::{AggregateComparison, AggregateFunction, SubqueryMatch};
pub use traits::{Matchable, NilComparable, Queryable};
pub use value::PredicateValue;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::reflectable;
    pub use crate::{
        AggregateComparison, AggregateFunction, FieldCache, Matchable, NilComparable, Predicate,
        PredicateBuilder, PredicateError, PredicateResult, PredicateValue, Queryable, Reflectable,
        StringOptions, SubqueryMatch,
    };
}
