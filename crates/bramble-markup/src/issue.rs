//! Tolerated anomalies found while tokenizing and building the tree.

use std::fmt;

use strum_macros::Display;

/// What kind of anomaly was tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum IssueKind {
    /// A tag line never reached a closing `>` before the input ended.
    UnterminatedTag,
    /// A tag had no name (`<>`, `</>`, `< div>`); it was skipped.
    EmptyTagName,
    /// An end tag closed an element with a different name. The element was
    /// closed anyway.
    MismatchedEndTag,
    /// An end tag arrived before any element was open; it was skipped.
    StrayEndTag,
    /// Text arrived before any element was open; it was dropped.
    StrayText,
    /// Input ended while elements were still open.
    UnclosedElements,
    /// Tokens followed the end tag of the root element; they were ignored.
    TrailingContent,
}

/// A tolerated anomaly, with the normalized line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Category of the anomaly.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// 1-based normalized line.
    pub line: usize,
}

impl ParseIssue {
    /// Create an issue.
    #[must_use]
    pub fn new(kind: IssueKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}
