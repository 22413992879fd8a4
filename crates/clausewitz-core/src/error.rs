//! Error types for script parsing.

use thiserror::Error;

/// Errors that can occur while parsing a Clausewitz script.
///
/// Both variants are fatal for the enclosing parse call: no partial tree is
/// ever returned alongside them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The input is structurally broken: an unterminated string or block, a
    /// key without `=`, a dangling `=`, a stray `}`, or nesting beyond the
    /// configured maximum depth.
    /// Includes the 1-based source line where the problem was detected.
    #[error("malformed document at line {line}: {reason}")]
    MalformedDocument { line: usize, reason: String },

    /// The input uses a construct the parser recognizes but refuses to
    /// convert (bare-scalar list blocks under `ListPolicy::Reject`).
    #[error("unsupported construct at line {line}: {reason}")]
    UnsupportedConstruct { line: usize, reason: String },
}

impl ScriptError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ScriptError::MalformedDocument {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(line: usize, reason: impl Into<String>) -> Self {
        ScriptError::UnsupportedConstruct {
            line,
            reason: reason.into(),
        }
    }

    /// The 1-based source line the error refers to (0 for empty input).
    pub fn line(&self) -> usize {
        match self {
            ScriptError::MalformedDocument { line, .. }
            | ScriptError::UnsupportedConstruct { line, .. } => *line,
        }
    }
}

/// Convenience alias used throughout clausewitz-core.
pub type Result<T> = std::result::Result<T, ScriptError>;
