//! Errors raised while bridging serde types and [`Value`](crate::value::Value) trees.

use std::fmt::Display;

/// Error type for serde serialization/deserialization through `Value`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerdeError {
    /// The value's kind does not match what the target type asked for.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    /// An unsigned integer that does not fit the document's `i64`.
    #[error("integer {0} is out of range for a document integer")]
    IntegerOutOfRange(u64),
    /// Map keys must serialize as strings, integers, booleans or chars.
    #[error("map key must be a string, found {0}")]
    InvalidMapKey(String),
    #[error("{0}")]
    Custom(String),
}

impl SerdeError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: &str) -> Self {
        SerdeError::TypeMismatch {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

impl serde::ser::Error for SerdeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}
