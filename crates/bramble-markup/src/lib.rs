//! Markup tokenizer and tree builder for the Bramble parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Line normalization** - every tag is forced onto its own line
//! - **Tokenizer** - tag lines become start/end tag tokens with attributes,
//!   other lines become text tokens; tags may span several lines
//! - **Tree builder** - a single-cursor builder that creates elements through
//!   an [`ElementRegistry`], so `<style>` elements get parsed rules
//!
//! # Not Implemented
//!
//! - Entity and character references
//! - Comments, doctypes, processing instructions
//! - Namespaces
//! - End tag matching; an end tag always closes the current element
//!
//! # Example
//!
//! ```
//! let tree = bramble_markup::parse("<div><text>Hello !</text></div>");
//! let root = tree.root().unwrap();
//! assert_eq!(tree.tag_name(root), Some("div"));
//! let text = tree.child(root, 0).unwrap();
//! assert_eq!(tree.content(text).as_deref(), Some("Hello !"));
//! ```

/// Tolerated anomalies.
pub mod issue;
/// Tree construction.
pub mod parser;
/// Line normalization and tokenization.
pub mod tokenizer;

use std::io::Read;

use bramble_common::{SourceError, clear_warnings, read_to_text};
use bramble_dom::{DomTree, ElementData, ElementKind, ElementRegistry};
use thiserror::Error;

pub use issue::{IssueKind, ParseIssue};
pub use parser::TreeBuilder;
pub use tokenizer::{MarkupTokenizer, Token, normalize_lines};

/// Errors surfaced by the parsing entry points.
///
/// The default entry points never fail on malformed markup; only reading a
/// stream or opting into strict mode can produce an error.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The input stream could not be turned into text.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Strict mode found at least one tolerated anomaly.
    #[error("malformed markup ({count} issue(s)), first at {first}")]
    Malformed {
        /// The first issue found.
        first: ParseIssue,
        /// Total number of issues.
        count: usize,
    },
}

/// Parser front end holding the element registry and options.
///
/// ```
/// use bramble_dom::ElementKind;
/// use bramble_markup::MarkupParser;
///
/// let parser = MarkupParser::new().with("note", |_| ElementKind::Generic(None));
/// let tree = parser.parse("<note>hi</note>");
/// assert!(tree.root().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MarkupParser {
    registry: ElementRegistry,
    strict_mode: bool,
}

impl MarkupParser {
    /// Parser with the default registry (`style` becomes a stylesheet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `tag_name`, replacing any previous one.
    #[must_use]
    pub fn with<F>(mut self, tag_name: &str, factory: F) -> Self
    where
        F: Fn(&ElementData) -> ElementKind + 'static,
    {
        self.registry.register(tag_name, factory);
        self
    }

    /// Alias of [`MarkupParser::with`].
    #[must_use]
    pub fn set<F>(self, tag_name: &str, factory: F) -> Self
    where
        F: Fn(&ElementData) -> ElementKind + 'static,
    {
        self.with(tag_name, factory)
    }

    /// Replace the whole registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ElementRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Enable strict mode: any tolerated anomaly makes the parse fail.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// The registry consulted for every start tag.
    #[must_use]
    pub const fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Mutable access to the registry.
    pub const fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    /// Parse `input` into a tree, tolerating malformed markup.
    ///
    /// Strict mode is not consulted here; see [`MarkupParser::try_parse`].
    #[must_use]
    pub fn parse(&self, input: &str) -> DomTree {
        self.parse_with_issues(input).0
    }

    /// Parse `input`, returning the tree and every tolerated anomaly.
    ///
    /// Warnings recorded by earlier documents are cleared first, so each
    /// document reports its own anomalies once.
    #[must_use]
    pub fn parse_with_issues(&self, input: &str) -> (DomTree, Vec<ParseIssue>) {
        clear_warnings();
        TreeBuilder::from_input(input, &self.registry).run_with_issues()
    }

    /// Parse `input`, failing in strict mode if any anomaly was tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Malformed`] in strict mode when issues were found.
    pub fn try_parse(&self, input: &str) -> Result<DomTree, MarkupError> {
        let (tree, mut issues) = self.parse_with_issues(input);
        if self.strict_mode && !issues.is_empty() {
            let count = issues.len();
            return Err(MarkupError::Malformed {
                first: issues.swap_remove(0),
                count,
            });
        }
        Ok(tree)
    }

    /// Read a stream to text and parse it like [`MarkupParser::try_parse`].
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Source`] if the stream cannot be read, or
    /// [`MarkupError::Malformed`] in strict mode.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<DomTree, MarkupError> {
        let text = read_to_text(reader)?;
        self.try_parse(&text)
    }
}

/// Parse `input` with the default registry.
#[must_use]
pub fn parse(input: &str) -> DomTree {
    MarkupParser::new().parse(input)
}

/// Read a stream and parse it with the default registry.
///
/// # Errors
///
/// Returns [`MarkupError::Source`] if the stream cannot be read.
pub fn parse_reader<R: Read>(reader: R) -> Result<DomTree, MarkupError> {
    MarkupParser::new().parse_reader(reader)
}
