//! Sensitivity flags for string comparisons.
//!
//! String operators accept a [`StringOptions`] value that renders as a
//! bracketed modifier suffix on the operator: `[c]` for case-insensitive,
//! `[d]` for diacritic-insensitive, `[cd]` for both, or nothing when no
//! flag is set.
//!
//! ```rust
//! use predikit::StringOptions;
//!
//! let opts = StringOptions::CASE_INSENSITIVE.union(StringOptions::DIACRITIC_INSENSITIVE);
//! assert!(opts.is_case_insensitive());
//! assert!(opts.is_diacritic_insensitive());
//! ```

/// Options describing how strict a string comparison is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StringOptions {
    case_insensitive: bool,
    diacritic_insensitive: bool,
}

impl StringOptions {
    /// The strictest comparison: both case- and diacritic-sensitive.
    pub const NONE: StringOptions = StringOptions {
        case_insensitive: false,
        diacritic_insensitive: false,
    };

    /// Ignore case: 'e' and 'E' match.
    pub const CASE_INSENSITIVE: StringOptions = StringOptions {
        case_insensitive: true,
        diacritic_insensitive: false,
    };

    /// Ignore diacritics: `e`, `é`, `ê` and `è` all match.
    pub const DIACRITIC_INSENSITIVE: StringOptions = StringOptions {
        case_insensitive: false,
        diacritic_insensitive: true,
    };

    /// Both flags at once.
    pub const CASE_AND_DIACRITIC_INSENSITIVE: StringOptions = StringOptions {
        case_insensitive: true,
        diacritic_insensitive: true,
    };

    /// Combine two option sets.
    pub fn union(self, other: StringOptions) -> StringOptions {
        StringOptions {
            case_insensitive: self.case_insensitive || other.case_insensitive,
            diacritic_insensitive: self.diacritic_insensitive || other.diacritic_insensitive,
        }
    }

    /// Whether case is ignored.
    pub fn is_case_insensitive(self) -> bool {
        self.case_insensitive
    }

    /// Whether diacritics are ignored.
    pub fn is_diacritic_insensitive(self) -> bool {
        self.diacritic_insensitive
    }

    /// The operator modifier suffix this option set renders as.
    pub(crate) fn suffix(self) -> &'static str {
        match (self.case_insensitive, self.diacritic_insensitive) {
            (false, false) => "",
            (true, false) => "[c]",
            (false, true) => "[d]",
            (true, true) => "[cd]",
        }
    }
}
