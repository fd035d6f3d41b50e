//! Error types for register, sequence and gate operations

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, QsimError>;

/// Errors raised at the boundary of every public operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QsimError {
    /// An argument of the wrong kind, e.g. a multi-qubit gate in a gate slot
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A size, index or count outside of what the operation accepts
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// The normalization invariant of a state was broken
    #[error("internal consistency failure: {0}")]
    InternalConsistency(String),
}

impl QsimError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        QsimError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn out_of_range(message: impl Into<String>) -> Self {
        QsimError::ValueOutOfRange(message.into())
    }
}
