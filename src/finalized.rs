//! Finalized predicates and the boolean-combination engine.
//!
//! Every terminal comparator returns a [`FinalizedPredicate`]: a snapshot
//! of the fragment it just wrote, still aliased to the scope's shared
//! core. Combining two of them with [`and`](FinalizedPredicate::and) /
//! [`or`](FinalizedPredicate::or) (or negating with
//! [`not`](FinalizedPredicate::not)) rewrites the shared core's expression
//! to the compound form and updates *both* operands, so a later
//! combination chains correctly whichever side it is applied to.
//!
//! # Flat chains
//!
//! Chains of the *same* operator stay flat: `a.and(&b)` then `.and(&c)`
//! renders `(a && b && c)`, not `((a && b) && c)`. This is done by keeping
//! a pending flat operand list per operator kind on each finalized
//! predicate instead of nesting binary trees. AND and OR lists are tracked
//! separately; switching operator kind forces a nesting boundary, so
//! `a.or(&b).and(&c)` renders `((a || b) && c)`.
//!
//! A pending list is only ever kept while the predicate's text is exactly
//! that list's rendering: a combine of one kind clears both operands'
//! opposite-kind list, and negation clears both, so a compound that has
//! been folded into a larger group can never resurrect its old chain.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::builder::BuilderHandle;
use crate::error::{PredicateError, PredicateResult};
use crate::reflect::Reflectable;
use crate::value::PredicateValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CombineKind {
    And,
    Or,
}

impl CombineKind {
    fn separator(self) -> &'static str {
        match self {
            CombineKind::And => " && ",
            CombineKind::Or => " || ",
        }
    }
}

#[derive(Debug)]
struct FinalizedState {
    /// This sub-expression's current rendering. Snapshot of the scope's
    /// expression text at creation; rewritten by every combination.
    text: String,
    /// Pending flat operand list for AND chains.
    and_chain: Vec<String>,
    /// Pending flat operand list for OR chains, tracked separately so the
    /// two kinds never merge into each other's flattened list.
    or_chain: Vec<String>,
    /// Bound values contributed by this expression, in emission order.
    arguments: Vec<PredicateValue>,
}

/// The combinable, negatable result of a completed comparison.
///
/// Produced by every terminal comparator and by every combination. All
/// finalized predicates of one compile scope alias the same shared
/// builder core.
pub struct FinalizedPredicate<T: Reflectable> {
    handle: BuilderHandle,
    state: Rc<RefCell<FinalizedState>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> Clone for FinalizedPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: Rc::clone(&self.state),
            _entity: PhantomData,
        }
    }
}

impl<T: Reflectable> fmt::Debug for FinalizedPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FinalizedPredicate")
            .field("text", &state.text)
            .field("arguments", &state.arguments.len())
            .finish()
    }
}

impl<T: Reflectable> FinalizedPredicate<T> {
    /// Stage a fresh leaf comparison: replace the scope's expression text
    /// with `text`, append `arguments` to the scope's argument list, and
    /// snapshot both. Leaves never append to the previous text; compound
    /// structure comes only from the combinators.
    pub(crate) fn leaf(
        handle: &BuilderHandle,
        text: String,
        arguments: Vec<PredicateValue>,
    ) -> Self {
        {
            let mut core = handle.core.borrow_mut();
            core.expression.clear();
            core.expression.push_str(&text);
            core.arguments.extend(arguments.iter().cloned());
        }
        tracing::trace!(fragment = %text, "staged leaf comparison");
        Self {
            handle: handle.clone(),
            state: Rc::new(RefCell::new(FinalizedState {
                text,
                and_chain: Vec::new(),
                or_chain: Vec::new(),
                arguments,
            })),
            _entity: PhantomData,
        }
    }

    /// This expression's current rendering.
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Combine with `rhs` under logical AND.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` originated from a different builder scope; use
    /// [`try_and`](Self::try_and) to handle that case as an error.
    pub fn and(&self, rhs: &Self) -> Self {
        match self.try_and(rhs) {
            Ok(combined) => combined,
            Err(err) => panic!("{err}"),
        }
    }

    /// Combine with `rhs` under logical OR.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` originated from a different builder scope; use
    /// [`try_or`](Self::try_or) to handle that case as an error.
    pub fn or(&self, rhs: &Self) -> Self {
        match self.try_or(rhs) {
            Ok(combined) => combined,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`and`](Self::and).
    pub fn try_and(&self, rhs: &Self) -> PredicateResult<Self> {
        self.combine(rhs, CombineKind::And)
    }

    /// Fallible [`or`](Self::or).
    pub fn try_or(&self, rhs: &Self) -> PredicateResult<Self> {
        self.combine(rhs, CombineKind::Or)
    }

    /// Negate this expression: renders `!(<text>)`.
    ///
    /// Negating twice wraps twice; no simplification is attempted.
    pub fn not(&self) -> Self {
        let rendered = {
            let mut state = self.state.borrow_mut();
            state.text = format!("!({})", state.text);
            state.and_chain.clear();
            state.or_chain.clear();
            state.text.clone()
        };
        let mut core = self.handle.core.borrow_mut();
        core.expression.clear();
        core.expression.push_str(&rendered);
        drop(core);
        tracing::trace!(expression = %rendered, "negated expression");
        self.clone()
    }

    fn combine(&self, rhs: &Self, kind: CombineKind) -> PredicateResult<Self> {
        if self.handle.scope != rhs.handle.scope {
            return Err(PredicateError::ScopeMismatch {
                lhs: self.handle.scope,
                rhs: rhs.handle.scope,
            });
        }

        // Snapshot the rhs first: when an expression is combined with
        // itself both operands share one state cell, and RefCell forbids
        // overlapping borrows.
        let same_cell = Rc::ptr_eq(&self.state, &rhs.state);
        let (rhs_text, rhs_chain, rhs_arguments) = {
            let state = rhs.state.borrow();
            let chain = match kind {
                CombineKind::And => state.and_chain.clone(),
                CombineKind::Or => state.or_chain.clone(),
            };
            (state.text.clone(), chain, state.arguments.clone())
        };

        let (merged, rendered, arguments) = {
            let state = self.state.borrow();
            let lhs_chain = match kind {
                CombineKind::And => &state.and_chain,
                CombineKind::Or => &state.or_chain,
            };

            // The four merge cases of the flat-list algorithm. Operands
            // associate left to right, so in straight-line chains only the
            // lhs ever holds a multi-element list; the remaining cases are
            // reached through explicitly grouped sub-expressions.
            let merged: Vec<String> = match (lhs_chain.is_empty(), rhs_chain.is_empty()) {
                (true, true) => vec![state.text.clone(), rhs_text],
                (false, true) => {
                    let mut merged = lhs_chain.clone();
                    merged.push(rhs_text);
                    merged
                }
                (true, false) => {
                    let mut merged = Vec::with_capacity(rhs_chain.len() + 1);
                    merged.push(state.text.clone());
                    merged.extend(rhs_chain);
                    merged
                }
                (false, false) => {
                    let mut merged = lhs_chain.clone();
                    merged.extend(rhs_chain);
                    merged
                }
            };

            let rendered = format!("({})", merged.join(kind.separator()));

            let mut arguments = state.arguments.clone();
            arguments.extend(rhs_arguments);

            (merged, rendered, arguments)
        };

        let write_back = |state: &mut FinalizedState| {
            state.text = rendered.clone();
            match kind {
                CombineKind::And => {
                    state.and_chain = merged.clone();
                    state.or_chain.clear();
                }
                CombineKind::Or => {
                    state.or_chain = merged.clone();
                    state.and_chain.clear();
                }
            }
            state.arguments = arguments.clone();
        };

        write_back(&mut self.state.borrow_mut());
        if !same_cell {
            write_back(&mut rhs.state.borrow_mut());
        }

        let mut core = self.handle.core.borrow_mut();
        core.expression.clear();
        core.expression.push_str(&rendered);
        core.arguments.clear();
        core.arguments.extend(arguments);
        drop(core);

        tracing::trace!(expression = %rendered, operands = merged.len(), "combined expressions");
        Ok(self.clone())
    }
}
