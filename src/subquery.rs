//! Aggregate match conditions for collection subqueries.
//!
//! A subquery filters a collection property down to the items matching an
//! inner predicate, then compares an aggregate of the surviving items
//! against an operand. [`SubqueryMatch`] describes that trailing
//! comparison; the subquery itself is built through
//! [`SequenceQuery::subquery`](crate::SequenceQuery::subquery).

/// Aggregate function applied to the items matching a subquery's inner
/// predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// Number of matching items.
    Count,
    /// Smallest matching item.
    Min,
    /// Largest matching item.
    Max,
    /// Mean of the matching items.
    Average,
}

impl AggregateFunction {
    fn keyword(self) -> &'static str {
        match self {
            AggregateFunction::Count => "@count",
            AggregateFunction::Min => "@min",
            AggregateFunction::Max => "@max",
            AggregateFunction::Average => "@avg",
        }
    }
}

/// Comparison applied between the aggregate and the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateComparison {
    /// Aggregate equals the operand.
    Equals,
    /// Aggregate is strictly greater than the operand.
    GreaterThan,
    /// Aggregate is greater than or equal to the operand.
    GreaterThanOrEqualTo,
    /// Aggregate is strictly less than the operand.
    LessThan,
    /// Aggregate is less than or equal to the operand.
    LessThanOrEqualTo,
}

impl AggregateComparison {
    fn operator(self) -> &'static str {
        match self {
            AggregateComparison::Equals => "==",
            AggregateComparison::GreaterThan => ">",
            AggregateComparison::GreaterThanOrEqualTo => ">=",
            AggregateComparison::LessThan => "<",
            AggregateComparison::LessThanOrEqualTo => "<=",
        }
    }
}

/// The aggregate condition a subquery's matching items must satisfy.
///
/// Returned from the subquery callback to complete the expression; the
/// common cases have shorthand constructors.
///
/// # Examples
///
/// ```rust
/// use predikit::{AggregateComparison, SubqueryMatch};
///
/// // At least three matching items.
/// let at_least_three =
///     SubqueryMatch::count(AggregateComparison::GreaterThanOrEqualTo, 3);
/// assert_eq!(at_least_three, SubqueryMatch::new(
///     predikit::AggregateFunction::Count,
///     AggregateComparison::GreaterThanOrEqualTo,
///     3,
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubqueryMatch {
    function: AggregateFunction,
    comparison: AggregateComparison,
    operand: i64,
}

impl SubqueryMatch {
    /// An arbitrary aggregate condition.
    pub fn new(function: AggregateFunction, comparison: AggregateComparison, operand: i64) -> Self {
        Self {
            function,
            comparison,
            operand,
        }
    }

    /// Compare the number of matching items against `operand`.
    pub fn count(comparison: AggregateComparison, operand: i64) -> Self {
        Self::new(AggregateFunction::Count, comparison, operand)
    }

    /// Compare the smallest matching item against `operand`.
    pub fn min(comparison: AggregateComparison, operand: i64) -> Self {
        Self::new(AggregateFunction::Min, comparison, operand)
    }

    /// Compare the largest matching item against `operand`.
    pub fn max(comparison: AggregateComparison, operand: i64) -> Self {
        Self::new(AggregateFunction::Max, comparison, operand)
    }

    /// Compare the mean of the matching items against `operand`.
    pub fn average(comparison: AggregateComparison, operand: i64) -> Self {
        Self::new(AggregateFunction::Average, comparison, operand)
    }

    /// At least one item matches.
    pub fn any() -> Self {
        Self::count(AggregateComparison::GreaterThan, 0)
    }

    /// No item matches.
    pub fn none() -> Self {
        Self::count(AggregateComparison::Equals, 0)
    }

    /// The `@fn op operand` tail appended after `SUBQUERY(...)`.
    pub(crate) fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.function.keyword(),
            self.comparison.operator(),
            self.operand
        )
    }
}
