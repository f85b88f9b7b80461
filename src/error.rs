//! Error types for predicate compilation.
//!
//! Almost everything in this crate is infallible by construction: unknown
//! field names degrade to a warning (see [`crate::reflect`]), an empty
//! compile produces an always-false predicate, and a subquery's aggregate
//! condition is enforced by the type system. The one misuse the API cannot
//! rule
//! out statically is combining two finalized predicates that were produced
//! by different builder scopes, which would yield a garbled expression if
//! allowed through.
//!
//! ```rust
//! use predikit::{PredicateError, ScopeId};
//!
//! let err = PredicateError::ScopeMismatch {
//!     lhs: ScopeId::next(),
//!     rhs: ScopeId::next(),
//! };
//! assert!(err.to_string().contains("different compile scopes"));
//! ```

use thiserror::Error;

use crate::builder::ScopeId;

/// Result type for fallible predicate operations.
pub type PredicateResult<T> = Result<T, PredicateError>;

/// Errors raised during predicate construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// Two finalized predicates from different builder scopes were combined.
    ///
    /// Every root compile and every subquery allocates its own scope;
    /// predicates may only be combined within the scope that produced them.
    #[error(
        "cannot combine finalized predicates from different compile scopes ({lhs} and {rhs}); \
         both operands must originate from the same builder"
    )]
    ScopeMismatch {
        /// Scope of the left-hand operand.
        lhs: ScopeId,
        /// Scope of the right-hand operand.
        rhs: ScopeId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_mismatch_message() {
        let lhs = ScopeId::next();
        let rhs = ScopeId::next();
        let err = PredicateError::ScopeMismatch { lhs, rhs };
        let message = err.to_string();
        assert!(message.contains(&lhs.to_string()));
        assert!(message.contains(&rhs.to_string()));
    }
}
