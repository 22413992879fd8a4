//! Parser configuration.
//!
//! `ParseOptions` carries the two knobs callers can turn: the maximum block
//! nesting depth and how bare-scalar list blocks (`tags = { a b c }`) are
//! treated. Both have defaults suitable for game files, so most callers use
//! [`crate::parse`] and never build options themselves.
//!
//! ```
//! use clausewitz_core::{parse_with, ListPolicy, ParseOptions, ScriptError};
//!
//! let opts = ParseOptions::default().with_list_policy(ListPolicy::Reject);
//! let err = parse_with(&["tags = { a b c }"], &opts).unwrap_err();
//! assert!(matches!(err, ScriptError::UnsupportedConstruct { .. }));
//! ```

/// Default limit on nested `{ }` levels.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do with a block holding bare values instead of `key = value` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPolicy {
    /// Drop the whole `key = { ... }` pair from the tree.
    #[default]
    Discard,
    /// Fail the parse with `ScriptError::UnsupportedConstruct`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed block nesting; the document root is depth 0.
    pub max_depth: usize,
    /// Handling of bare-scalar list blocks.
    pub list_policy: ListPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            list_policy: ListPolicy::Discard,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_list_policy(mut self, list_policy: ListPolicy) -> Self {
        self.list_policy = list_policy;
        self
    }
}
