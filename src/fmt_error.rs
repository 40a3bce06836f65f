//! Errors in ISO 15022 format specifications or in applying them to values
use std::fmt::Display;

/// Type alias for a `Result` with [`FmtError`] as the error type.
pub type FmtResult<T> = Result<T, FmtError>;


/// An error related to an ISO 15022 format specification
///
/// Offsets are byte offsets into the format specification string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FmtError {
    /// Indicates that a field length was followed by something other than
    /// one of the character set letters `n`, `a`, `c`, `x`, `e` or `d`.
    InvalidCharacterSet{ found: String, offset: usize },

    /// Indicates that the specification ended right after a field length.
    MissingCharacterSet{ offset: usize },

    /// Indicates that a repeat count (e.g. the `4*` in `4*35x`) was not
    /// followed by a maximum length.
    MissingRepeatLength{ offset: usize },

    /// Indicates that a group opened at `offset` was not closed by `expected`
    /// before the specification ended or a different closing bracket appeared.
    UnclosedGroup{ expected: char, offset: usize },

    /// Indicates a closing bracket with no group open.
    UnexpectedGroupEnd{ found: char, offset: usize },

    /// Indicates a capture (`(...)`) or reformat (`<...>`) group inside another
    /// capture or reformat group. `offset` is `None` when the problem is found
    /// while compiling an already-built AST.
    NestedCaptureGroup{ opener: char, offset: Option<usize> },

    /// Indicates that a value extraction was requested from a specification
    /// with more than one capture group.
    MultipleCaptureGroups{ count: usize },

    /// Indicates that the generated pattern was rejected by the regex engine.
    InvalidPattern{ pattern: String, reason: String },
}

impl Display for FmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FmtError::InvalidCharacterSet { found, offset } => {
                write!(f, "Invalid character set '{found}' at offset {offset}")
            },
            FmtError::MissingCharacterSet { offset } => {
                write!(f, "Missing character set after field length at offset {offset}")
            },
            FmtError::MissingRepeatLength { offset } => {
                write!(f, "Missing maximum length after repeat count at offset {offset}")
            },
            FmtError::UnclosedGroup { expected, offset } => {
                write!(f, "Missing closing bracket {expected} for group opened at offset {offset}")
            },
            FmtError::UnexpectedGroupEnd { found, offset } => {
                write!(f, "Unexpected closing bracket {found} at offset {offset}")
            },
            FmtError::NestedCaptureGroup { opener, offset: Some(offset) } => {
                write!(f, "Capture group {opener} at offset {offset} cannot be inside another capture group")
            },
            FmtError::NestedCaptureGroup { opener, offset: None } => {
                write!(f, "Capture group {opener} cannot be inside another capture group")
            },
            FmtError::MultipleCaptureGroups { count } => {
                write!(f, "More than one capture group specified ({count} found)")
            },
            FmtError::InvalidPattern { pattern, reason } => {
                write!(f, "Generated pattern '{pattern}' is not a valid regular expression: {reason}")
            }
        }
    }
}

impl std::error::Error for FmtError {}

impl FmtError {
    pub fn from_regex(e: regex::Error, pattern: String) -> Self {
        Self::InvalidPattern { pattern, reason: e.to_string() }
    }
}
