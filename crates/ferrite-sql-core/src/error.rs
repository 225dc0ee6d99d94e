//! Core error types.

use thiserror::Error;

/// Failure while reconstructing a typed value from a result row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A non-nullable value came back as NULL from the engine.
    #[error("unexpected NULL for a non-nullable value")]
    UnexpectedNull,

    /// The stored value has a different storage class than the field type.
    #[error("expected {expected} but the row holds {got}")]
    TypeMismatch {
        /// Storage class the field type maps to.
        expected: &'static str,
        /// Storage class actually present in the row.
        got: &'static str,
    },

    /// A value could not be parsed into its host representation.
    #[error("malformed {what}: `{text}`")]
    Malformed {
        /// What was being parsed (e.g. a timestamp format).
        what: &'static str,
        /// The offending text.
        text: String,
    },

    /// The row ended before all requested columns were read.
    #[error("row has no column at index {0}")]
    MissingColumn(usize),
}
