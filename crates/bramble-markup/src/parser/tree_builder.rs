//! Building an element tree from the token list.
//!
//! The builder keeps a single "current element" cursor:
//! - a start tag creates an element through the registry; the first one
//!   becomes the root, later ones are appended to the current element and,
//!   unless self-closing, become current
//! - text lines accumulate, joined with `\n`, until the next end tag assigns
//!   them as the current element's content; a start tag discards them
//! - an end tag moves the cursor to the parent, or finishes the parse when
//!   the current element has none
//!
//! End tag names are not matched against the open element. Whatever is
//! current gets closed.

use bramble_common::warn_once;
use bramble_dom::{DomTree, ElementRegistry, NodeId};

use crate::issue::{IssueKind, ParseIssue};
use crate::tokenizer::{MarkupTokenizer, Token};

/// Builds one [`DomTree`] from tokens, consulting an [`ElementRegistry`] for
/// every start tag.
pub struct TreeBuilder<'r> {
    /// Factories for the element kinds.
    registry: &'r ElementRegistry,

    /// Tree under construction.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// The open element new children and text go to.
    current: Option<NodeId>,

    /// Text lines seen since the last tag.
    pending_text: String,

    /// Set once the root element has been closed.
    stopped: bool,

    /// The root start tag was written as `<name ... />`.
    root_closed_itself: bool,

    /// Line of the token being processed.
    line: usize,

    /// Issues found while building.
    issues: Vec<ParseIssue>,
}

impl<'r> TreeBuilder<'r> {
    /// Create a builder over a token list.
    #[must_use]
    pub fn new(tokens: Vec<Token>, registry: &'r ElementRegistry) -> Self {
        Self {
            registry,
            tree: DomTree::new(),
            tokens,
            current: None,
            pending_text: String::new(),
            stopped: false,
            root_closed_itself: false,
            line: 0,
            issues: Vec::new(),
        }
    }

    /// Create a builder over the tokens of `input`, keeping tokenizer issues.
    #[must_use]
    pub fn from_input(input: &str, registry: &'r ElementRegistry) -> Self {
        let mut tokenizer = MarkupTokenizer::new(input);
        tokenizer.run();
        let (tokens, issues) = tokenizer.into_parts();
        let mut builder = Self::new(tokens, registry);
        builder.issues = issues;
        builder
    }

    /// Run the builder and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the builder and return both the tree and any issues.
    ///
    /// The tree's root is the first element, or, if the input ended before
    /// the root was closed, the element that was current at that point.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let mut tokens = std::mem::take(&mut self.tokens).into_iter();

        for token in tokens.by_ref() {
            self.line = token.line();
            self.process_token(token);
            if self.stopped {
                break;
            }
        }

        if let Some(extra) = tokens.next() {
            self.issue(
                IssueKind::TrailingContent,
                "content after the root element ignored".to_string(),
                extra.line(),
            );
        }

        if !self.stopped {
            self.finish_unclosed();
        }

        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
                ..
            } => {
                self.pending_text.clear();
                let element = self.registry.create(&mut self.tree, &name, attributes);
                match self.current {
                    None => {
                        self.tree.set_root(Some(element));
                        self.current = Some(element);
                        self.root_closed_itself = self_closing;
                    }
                    Some(parent) => {
                        self.tree.append_child(parent, element);
                        if !self_closing {
                            self.current = Some(element);
                        }
                    }
                }
            }

            Token::EndTag { name, line } => {
                let Some(current) = self.current else {
                    self.issue(
                        IssueKind::StrayEndTag,
                        format!("</{name}> before any element"),
                        line,
                    );
                    return;
                };

                if let Some(open) = self.tree.tag_name(current)
                    && !open.eq_ignore_ascii_case(&name)
                {
                    let message = format!("</{name}> closes <{open}>");
                    self.issue(IssueKind::MismatchedEndTag, message, line);
                }

                if !self.pending_text.is_empty() {
                    let text = std::mem::take(&mut self.pending_text);
                    self.tree.set_content(current, Some(&text));
                }

                match self.tree.parent(current) {
                    None => {
                        self.tree.set_root(Some(current));
                        self.stopped = true;
                    }
                    Some(parent) => self.current = Some(parent),
                }
            }

            Token::Text { data, line } => {
                if self.current.is_none() {
                    self.issue(
                        IssueKind::StrayText,
                        format!("text before any element dropped: {data}"),
                        line,
                    );
                    return;
                }
                if !self.pending_text.is_empty() {
                    self.pending_text.push('\n');
                }
                self.pending_text.push_str(&data);
            }
        }
    }

    /// Input ran out before the root was closed.
    fn finish_unclosed(&mut self) {
        let Some(current) = self.current else { return };
        self.tree.set_root(Some(current));

        if self.tree.has_parent(current) || !self.root_closed_itself {
            let open = self.tree.ancestors(current).count() + 1;
            self.issue(
                IssueKind::UnclosedElements,
                format!("input ended with {open} element(s) still open"),
                self.line,
            );
        }
    }

    fn issue(&mut self, kind: IssueKind, message: String, line: usize) {
        warn_once("Markup Parser", &message);
        self.issues.push(ParseIssue::new(kind, message, line));
    }
}
