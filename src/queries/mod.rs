//! Typed per-field-kind query surfaces.
//!
//! Each field accessor on [`PredicateBuilder`](crate::PredicateBuilder)
//! returns one of these query types, and each query type exposes exactly
//! the comparators valid for its field kind. Comparators are terminal:
//! they write a complete fragment into the scope and return a
//! [`FinalizedPredicate`](crate::FinalizedPredicate).

mod basic;
mod boolean;
mod date;
mod member;
mod number;
mod sequence;
mod string;

pub use basic::BasicQuery;
pub use boolean::BooleanQuery;
pub use date::DateQuery;
pub use member::MemberQuery;
pub use number::NumberQuery;
pub use sequence::SequenceQuery;
pub use string::StringQuery;
