//! Error types for the filter crate.

use thiserror::Error;

use crate::op::Op;

/// Errors that can occur when building a processor, compiling rules or
/// applying them to a collection.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Operator tag is not part of the vocabulary.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// Reference value has the wrong type for the operator.
    #[error("operator '{op}' requires a {expected} reference value, got {found}")]
    InvalidReference {
        op: Op,
        expected: &'static str,
        found: &'static str,
    },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Processor configuration was rejected.
    #[error("invalid {option} setting: {reason}")]
    InvalidConfig {
        option: &'static str,
        reason: String,
    },

    /// The dynamic input is not an ordered collection.
    #[error("expected an array of elements, got {found}")]
    NotACollection { found: &'static str },

    /// A path segment remains but the current value cannot be navigated.
    #[error("cannot descend into {found} value at '{segment}' in path '{path}'")]
    ScalarTraversal {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// The path addresses a field that is not public.
    #[error("field '{field}' in path '{path}' is not accessible")]
    PrivateField { path: String, field: String },

    /// The element itself is nil and a path was requested.
    #[error("cannot resolve path '{path}' on a nil element")]
    NilElement { path: String },

    /// A string-only operator was applied to a non-textual value.
    #[error("operator '{op}' requires a string value, got {found}")]
    NotText { op: Op, found: &'static str },

    /// The rule set holds more rules than the processor accepts.
    #[error("too many rules: {count} exceeds the maximum of {max}")]
    TooManyRules { count: usize, max: usize },

    /// The requested window length is out of range.
    #[error("invalid window length {length}: must be between 1 and {max}")]
    InvalidWindow { length: usize, max: usize },

    /// The rule payload could not be decoded.
    #[error("invalid filter rules: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Broad category of a [`FilterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad operator, reference value, pattern or configuration.
    Construction,
    /// The collection argument has the wrong shape.
    InputShape,
    /// A field path could not be followed.
    Navigation,
    /// An evaluator could not compare the candidate.
    Evaluation,
    /// A configured limit was exceeded.
    Limit,
    /// Malformed rule encoding.
    Decode,
}

impl FilterError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::UnknownOperator(_)
            | FilterError::InvalidReference { .. }
            | FilterError::InvalidRegex(_)
            | FilterError::InvalidConfig { .. } => ErrorKind::Construction,
            FilterError::NotACollection { .. } => ErrorKind::InputShape,
            FilterError::ScalarTraversal { .. }
            | FilterError::PrivateField { .. }
            | FilterError::NilElement { .. } => ErrorKind::Navigation,
            FilterError::NotText { .. } => ErrorKind::Evaluation,
            FilterError::TooManyRules { .. } | FilterError::InvalidWindow { .. } => {
                ErrorKind::Limit
            }
            FilterError::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
