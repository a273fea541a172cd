use std::fmt;

/// One step of a decode path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// The string form used to address digest nodes.
    pub fn as_digest_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Location of a value inside a document, from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }

    /// A new path extended by an object key.
    pub fn join_key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Path(segments)
    }

    /// A new path extended by an array index.
    pub fn join_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Path(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Segments rendered as strings, indices in decimal.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(PathSegment::as_digest_key).collect()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last key segment, if the path ends in one.
    pub fn last_key(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// What went wrong while decoding a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("expected {expected}, found null")]
    ValueNotFound { expected: String },

    #[error("data corrupted: {message}")]
    DataCorrupted { message: String },

    /// A raw value that no case of a non-frozen enum recognizes. Producers
    /// running ahead of consumers send these routinely.
    #[error("unknown raw value {raw} for {type_name}")]
    UnknownNovelValue { type_name: String, raw: String },

    #[error("no matching polymorphic type for identifier '{identifier}'")]
    NoMatchingPolymorphicType { identifier: String },

    #[error("decoded {decoded} but could not treat it as {expected}")]
    PolymorphicTypeMismatch { decoded: String, expected: String },

    #[error("{} of {element_count} array elements failed to decode", .errors.len())]
    ArrayDecoding {
        element_count: usize,
        errors: Vec<DecodeError>,
    },

    #[error("{} of {entry_count} dictionary entries failed to decode", .errors.len())]
    DictionaryDecoding {
        entry_count: usize,
        errors: Vec<DecodeError>,
    },

    #[error("{0}")]
    Custom(String),
}

/// A decode failure together with the path it occurred at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at {path}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub path: Path,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, path: Path) -> Self {
        DecodeError { kind, path }
    }

    pub fn type_mismatch(
        path: &Path,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        DecodeError::new(
            DecodeErrorKind::TypeMismatch {
                expected: expected.into(),
                found: found.into(),
            },
            path.clone(),
        )
    }

    pub fn key_not_found(path: &Path, key: impl Into<String>) -> Self {
        DecodeError::new(DecodeErrorKind::KeyNotFound { key: key.into() }, path.clone())
    }

    pub fn value_not_found(path: &Path, expected: impl Into<String>) -> Self {
        DecodeError::new(
            DecodeErrorKind::ValueNotFound {
                expected: expected.into(),
            },
            path.clone(),
        )
    }

    pub fn data_corrupted(path: &Path, message: impl Into<String>) -> Self {
        DecodeError::new(
            DecodeErrorKind::DataCorrupted {
                message: message.into(),
            },
            path.clone(),
        )
    }

    pub fn custom(path: &Path, message: impl Into<String>) -> Self {
        DecodeError::new(DecodeErrorKind::Custom(message.into()), path.clone())
    }

    pub fn is_unknown_novel_value(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::UnknownNovelValue { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::TypeMismatch { .. })
    }

    /// Whether this error only collects per-element failures.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self.kind,
            DecodeErrorKind::ArrayDecoding { .. } | DecodeErrorKind::DictionaryDecoding { .. }
        )
    }
}

/// Errors from encoding a value back into a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: Path, message: String },

    #[error("cannot represent '{value}' as {representation} at {path}")]
    LosslessConversion {
        path: Path,
        value: String,
        representation: &'static str,
    },

    #[error("cannot encode {type_name} at {path}: no polymorphic candidate accepts it")]
    PolymorphicEncoding { path: Path, type_name: String },

    #[error("encode error: {0}")]
    Custom(String),
}

/// Top-level error type that wraps all sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for whole-document operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = Path::root().join_key("items").join_index(2).join_key("name");
        assert_eq!(path.to_string(), "items[2].name");
        assert_eq!(path.to_strings(), vec!["items", "2", "name"]);
        assert_eq!(Path::root().to_string(), "<root>");
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::type_mismatch(&Path::root().join_key("age"), "integer", "string");
        assert_eq!(
            err.to_string(),
            "type mismatch: expected integer, found string at age"
        );
    }

    #[test]
    fn test_aggregate_display() {
        let element = DecodeError::value_not_found(&Path::root().join_index(1), "integer");
        let kind = DecodeErrorKind::ArrayDecoding {
            element_count: 3,
            errors: vec![element],
        };
        assert_eq!(kind.to_string(), "1 of 3 array elements failed to decode");
    }
}
