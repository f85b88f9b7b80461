use std::marker::PhantomData;

use crate::builder::{BuilderHandle, KeyPath};
use crate::finalized::FinalizedPredicate;
use crate::options::StringOptions;
use crate::reflect::Reflectable;
use crate::traits::{Matchable, NilComparable, Queryable};

/// Quote and escape a string operand for inline embedding.
///
/// String operands are embedded in the expression text rather than bound,
/// so quotes and backslashes in the value must be escaped.
pub(crate) fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Query over a `String` property.
///
/// All comparators take a [`StringOptions`] selecting case and diacritic
/// sensitivity, rendered as the `[c]`/`[d]`/`[cd]` operator suffix.
pub struct StringQuery<T: Reflectable> {
    handle: BuilderHandle,
    path: KeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Reflectable> StringQuery<T> {
    pub(crate) fn new(handle: BuilderHandle, path: KeyPath) -> Self {
        Self {
            handle,
            path,
            _entity: PhantomData,
        }
    }

    fn compare(
        &self,
        operator: &str,
        value: impl AsRef<str>,
        options: StringOptions,
    ) -> FinalizedPredicate<T> {
        FinalizedPredicate::leaf(
            &self.handle,
            format!(
                "{} {}{} {}",
                self.path,
                operator,
                options.suffix(),
                quoted(value.as_ref())
            ),
            Vec::new(),
        )
    }

    /// Matches when the property equals `string`.
    pub fn equals(&self, string: impl AsRef<str>, options: StringOptions) -> FinalizedPredicate<T> {
        self.compare("==", string, options)
    }

    /// Matches when the property starts with `string`.
    pub fn begins_with(
        &self,
        string: impl AsRef<str>,
        options: StringOptions,
    ) -> FinalizedPredicate<T> {
        self.compare("BEGINSWITH", string, options)
    }

    /// Matches when the property ends with `string`.
    pub fn ends_with(
        &self,
        string: impl AsRef<str>,
        options: StringOptions,
    ) -> FinalizedPredicate<T> {
        self.compare("ENDSWITH", string, options)
    }

    /// Matches when the property contains `string`.
    pub fn contains(
        &self,
        string: impl AsRef<str>,
        options: StringOptions,
    ) -> FinalizedPredicate<T> {
        self.compare("CONTAINS", string, options)
    }

    /// Matches when the property matches the regular expression `pattern`.
    /// The pattern is passed through verbatim apart from quote escaping.
    pub fn matches(
        &self,
        pattern: impl AsRef<str>,
        options: StringOptions,
    ) -> FinalizedPredicate<T> {
        self.compare("MATCHES", pattern, options)
    }

    /// Matches when the property is the empty string.
    pub fn is_empty(&self) -> FinalizedPredicate<T> {
        self.equals("", StringOptions::NONE)
    }
}

impl<T: Reflectable> Queryable for StringQuery<T> {
    type Entity = T;

    fn handle(&self) -> &BuilderHandle {
        &self.handle
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

impl<T: Reflectable> NilComparable for StringQuery<T> {}
impl<T: Reflectable> Matchable for StringQuery<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("Kraken"), r#""Kraken""#);
        assert_eq!(quoted(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quoted(r"back\slash"), r#""back\\slash""#);
    }
}
