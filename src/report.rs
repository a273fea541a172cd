//! Collection of recovered decode errors.
//!
//! An [`ErrorReporter`] lives for exactly one top-level decode. Resilient
//! wrappers push every error they swallow into it at their own path, and the
//! caller flushes it afterwards to get an [`ErrorDigest`].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::DecodeError;

/// One node of the digest tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigestNode {
    shallow_errors: Vec<DecodeError>,
    children: BTreeMap<String, DigestNode>,
}

impl DigestNode {
    fn insert(&mut self, error: DecodeError, path: &[String]) {
        let mut node = self;
        for segment in path {
            node = node.children.entry(segment.clone()).or_default();
        }
        node.shallow_errors.push(error);
    }

    /// Errors recorded at exactly this node, in insertion order.
    pub fn shallow_errors(&self) -> &[DecodeError] {
        &self.shallow_errors
    }

    pub fn children(&self) -> &BTreeMap<String, DigestNode> {
        &self.children
    }

    pub fn child(&self, segment: &str) -> Option<&DigestNode> {
        self.children.get(segment)
    }

    /// This node's errors followed by every descendant's, children in key order.
    pub fn errors(&self, include_unknown_novel_values: bool) -> Vec<&DecodeError> {
        let mut out = Vec::new();
        self.collect(include_unknown_novel_values, &mut out);
        out
    }

    fn collect<'a>(&'a self, include_unknown_novel_values: bool, out: &mut Vec<&'a DecodeError>) {
        out.extend(
            self.shallow_errors
                .iter()
                .filter(|e| include_unknown_novel_values || !e.is_unknown_novel_value()),
        );
        for child in self.children.values() {
            child.collect(include_unknown_novel_values, out);
        }
    }

    fn is_empty(&self) -> bool {
        self.shallow_errors.is_empty() && self.children.values().all(DigestNode::is_empty)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for error in &self.shallow_errors {
            writeln!(f, "{:indent$}- {}", "", error.kind, indent = depth * 2)?;
        }
        for (segment, child) in &self.children {
            writeln!(f, "{:indent$}{}", "", segment, indent = depth * 2)?;
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Tree of errors recorded during one decode, keyed by path segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDigest {
    root: DigestNode,
    may_be_missing_reported_errors: bool,
}

impl ErrorDigest {
    /// All recorded errors except unknown novel enum values.
    pub fn errors(&self) -> Vec<&DecodeError> {
        self.root.errors(false)
    }

    /// All recorded errors, unknown novel enum values included.
    pub fn errors_including_unknown_novel_values(&self) -> Vec<&DecodeError> {
        self.root.errors(true)
    }

    /// Set when the reporter that built this digest was displaced while
    /// installed. The absence of an error in this digest then proves nothing.
    pub fn may_be_missing_reported_errors(&self) -> bool {
        self.may_be_missing_reported_errors
    }

    pub fn root(&self) -> &DigestNode {
        &self.root
    }

    /// The node addressed by `path`, if anything was recorded at or below it.
    pub fn node(&self, path: &[&str]) -> Option<&DigestNode> {
        let mut node = &self.root;
        for segment in path {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Errors recorded at exactly `path`.
    pub fn errors_at(&self, path: &[&str]) -> &[DecodeError] {
        self.node(path).map(DigestNode::shallow_errors).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl fmt::Display for ErrorDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.may_be_missing_reported_errors {
            writeln!(f, "(may be missing reported errors)")?;
        }
        self.root.write_tree(f, 0)
    }
}

/// Mutable sink for errors swallowed by resilient wrappers.
///
/// Not shareable between concurrent decodes: each top-level decode gets its
/// own reporter.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    root: DigestNode,
    has_errors: bool,
    may_be_missing_reported_errors: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    /// Insert `error` at the node addressed by `at_path`, creating
    /// intermediate nodes as needed.
    pub fn record(&mut self, error: DecodeError, at_path: &[String]) {
        self.root.insert(error, at_path);
        self.has_errors = true;
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Return the accumulated digest and reset to empty.
    ///
    /// Returns `None` when nothing was recorded since the last flush, unless
    /// the reporter was displaced, in which case an empty digest carrying the
    /// "may be missing reported errors" flag is returned.
    pub fn flush(&mut self) -> Option<ErrorDigest> {
        if !self.has_errors && !self.may_be_missing_reported_errors {
            return None;
        }
        let digest = ErrorDigest {
            root: std::mem::take(&mut self.root),
            may_be_missing_reported_errors: self.may_be_missing_reported_errors,
        };
        self.has_errors = false;
        self.may_be_missing_reported_errors = false;
        tracing::trace!(
            errors = digest.errors_including_unknown_novel_values().len(),
            "flushed error digest"
        );
        Some(digest)
    }

    pub(crate) fn mark_may_be_missing_reported_errors(&mut self) {
        self.may_be_missing_reported_errors = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeErrorKind, Path};

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_creates_intermediate_nodes() {
        let mut reporter = ErrorReporter::new();
        let error = DecodeError::custom(&Path::root(), "boom");
        reporter.record(error.clone(), &segments(&["a", "b", "c"]));

        let digest = reporter.flush().unwrap();
        assert_eq!(digest.errors_at(&["a", "b", "c"]), &[error]);
        assert!(digest.errors_at(&["a", "b"]).is_empty());
        assert!(digest.node(&["a", "b"]).is_some());
        assert!(digest.node(&["x"]).is_none());
    }

    #[test]
    fn test_flatten_order() {
        let mut reporter = ErrorReporter::new();
        let e = |m: &str| DecodeError::custom(&Path::root(), m);
        reporter.record(e("b-first"), &segments(&["b"]));
        reporter.record(e("a"), &segments(&["a"]));
        reporter.record(e("root"), &[]);
        reporter.record(e("b-second"), &segments(&["b"]));

        let digest = reporter.flush().unwrap();
        let messages: Vec<String> = digest.errors().iter().map(|e| e.kind.to_string()).collect();
        assert_eq!(messages, vec!["root", "a", "b-first", "b-second"]);
    }

    #[test]
    fn test_unknown_novel_values_filtered() {
        let mut reporter = ErrorReporter::new();
        let novel = DecodeError::new(
            DecodeErrorKind::UnknownNovelValue {
                type_name: "Color".into(),
                raw: "\"mauve\"".into(),
            },
            Path::root(),
        );
        reporter.record(novel, &segments(&["color"]));

        let digest = reporter.flush().unwrap();
        assert!(digest.errors().is_empty());
        assert_eq!(digest.errors_including_unknown_novel_values().len(), 1);
    }

    #[test]
    fn test_flush_resets() {
        let mut reporter = ErrorReporter::new();
        assert!(reporter.flush().is_none());
        reporter.record(DecodeError::custom(&Path::root(), "x"), &[]);
        assert!(reporter.has_errors());
        assert!(reporter.flush().is_some());
        assert!(!reporter.has_errors());
        assert!(reporter.flush().is_none());
    }

    #[test]
    fn test_displaced_flag_survives_empty_flush() {
        let mut reporter = ErrorReporter::new();
        reporter.mark_may_be_missing_reported_errors();
        let digest = reporter.flush().unwrap();
        assert!(digest.may_be_missing_reported_errors());
        assert!(digest.is_empty());
    }

    #[test]
    fn test_display_tree() {
        let mut reporter = ErrorReporter::new();
        reporter.record(DecodeError::custom(&Path::root(), "bad"), &segments(&["items", "1"]));
        let digest = reporter.flush().unwrap();
        assert_eq!(digest.to_string(), "items\n  1\n    - bad\n");
    }
}
