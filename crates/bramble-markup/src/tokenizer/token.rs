//! Tokens produced from normalized lines.

use bramble_dom::AttributesMap;
use strum_macros::Display;

/// One tag line or text line of the normalized input.
///
/// `line` is the 1-based index of the normalized line the token starts on.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Token {
    /// `<name attr="value">`, or `<name ... />` when `self_closing` is set.
    StartTag {
        /// Tag name as written.
        name: String,
        /// All `key="value"` pairs found in the tag, last one wins.
        attributes: AttributesMap,
        /// The tag closed itself with `/>`.
        self_closing: bool,
        /// Source line.
        line: usize,
    },

    /// `</name>`.
    EndTag {
        /// Tag name as written, without the slash.
        name: String,
        /// Source line.
        line: usize,
    },

    /// A non-empty line of text.
    Text {
        /// The trimmed line.
        data: String,
        /// Source line.
        line: usize,
    },
}

impl Token {
    /// Source line of the token.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::StartTag { line, .. } | Self::EndTag { line, .. } | Self::Text { line, .. } => {
                *line
            }
        }
    }
}
