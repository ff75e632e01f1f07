//! Turning normalized lines into tokens.

use std::sync::LazyLock;

use bramble_common::warn_once;
use bramble_dom::AttributesMap;
use regex::Regex;

use super::normalize::normalize_lines;
use super::token::Token;
use crate::issue::{IssueKind, ParseIssue};

/// `key="value"` inside a tag. Keys allow letters, digits, `:`, `_` and `-`.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>[a-zA-Z0-9:_-]+)="(?P<value>[^"]*)""#).expect("valid regex")
});

/// Byte index where the tag name of `tag` (which starts with `<`) ends.
///
/// First match wins:
/// 1. the first space
/// 2. the first `>`, moved back by one when it is preceded by `/`
/// 3. the first `/`
/// 4. the end of the string
pub(crate) fn tag_name_end(tag: &str) -> usize {
    if let Some(space) = tag.find(' ') {
        return space;
    }
    if let Some(gt) = tag.find('>') {
        return if gt > 0 && tag.as_bytes()[gt - 1] == b'/' {
            gt - 1
        } else {
            gt
        };
    }
    tag.find('/').unwrap_or(tag.len())
}

/// Whether the character before the final one is `/`, as in `<br/>`.
fn closes_itself(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() >= 2 && bytes[bytes.len() - 2] == b'/'
}

/// Collect every attribute in `tag`; a repeated key keeps its last value.
pub(crate) fn extract_attributes(tag: &str) -> AttributesMap {
    ATTRIBUTE
        .captures_iter(tag)
        .map(|caps| (caps["key"].to_string(), caps["value"].to_string()))
        .collect()
}

/// Line-based tokenizer.
///
/// Produces a flat token list from normalized lines. Tag lines that do not
/// end in `>` are joined with the following lines (separated by one space)
/// until one does, so attribute values may span lines.
pub struct MarkupTokenizer {
    lines: Vec<String>,
    cursor: usize,
    tokens: Vec<Token>,
    issues: Vec<ParseIssue>,
}

impl MarkupTokenizer {
    /// Create a tokenizer over `input`, normalizing it into lines.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            lines: normalize_lines(input),
            cursor: 0,
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Tokenize every line.
    pub fn run(&mut self) {
        while self.cursor < self.lines.len() {
            let line_number = self.cursor + 1;
            let line = std::mem::take(&mut self.lines[self.cursor]);
            self.cursor += 1;

            if line.starts_with('<') {
                let tag = self.join_tag_lines(line, line_number);
                self.emit_tag(&tag, line_number);
            } else if !line.is_empty() {
                self.tokens.push(Token::Text {
                    data: line,
                    line: line_number,
                });
            }
        }
    }

    /// Tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Issues found so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume the tokenizer, returning the tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Consume the tokenizer, returning tokens and issues.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Token>, Vec<ParseIssue>) {
        (self.tokens, self.issues)
    }

    fn join_tag_lines(&mut self, first: String, line_number: usize) -> String {
        let mut tag = first;
        while !tag.ends_with('>') {
            let Some(next) = self.lines.get_mut(self.cursor) else {
                self.issue(
                    IssueKind::UnterminatedTag,
                    format!("tag never closed with '>': {tag}"),
                    line_number,
                );
                break;
            };
            tag.push(' ');
            tag.push_str(&std::mem::take(next));
            self.cursor += 1;
        }
        tag
    }

    fn emit_tag(&mut self, tag: &str, line_number: usize) {
        let end = tag_name_end(tag);
        let raw_name = tag.get(1..end).unwrap_or_default();

        let (name, is_end_tag) = match raw_name.strip_prefix('/') {
            Some(name) => (name, true),
            None => (raw_name, false),
        };
        if name.is_empty() {
            self.issue(
                IssueKind::EmptyTagName,
                format!("tag without a name skipped: {tag}"),
                line_number,
            );
            return;
        }

        let token = if is_end_tag {
            Token::EndTag {
                name: name.to_string(),
                line: line_number,
            }
        } else {
            Token::StartTag {
                name: name.to_string(),
                attributes: extract_attributes(tag),
                self_closing: closes_itself(tag),
                line: line_number,
            }
        };
        self.tokens.push(token);
    }

    fn issue(&mut self, kind: IssueKind, message: String, line: usize) {
        warn_once("Markup Tokenizer", &message);
        self.issues.push(ParseIssue::new(kind, message, line));
    }
}
