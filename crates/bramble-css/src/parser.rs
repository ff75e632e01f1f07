//! Stylesheet text to rules, and back.
//!
//! The accepted dialect is deliberately small:
//!
//! ```text
//! selector, selector { name: value; name: value; }
//! ```
//!
//! All ASCII whitespace (space, tab, newline, vertical tab, form feed and
//! carriage return) is removed before splitting, including inside selectors
//! and values. `.a .b` becomes `.a.b` and `1px solid red` becomes
//! `1pxsolidred`. Other Unicode spaces such as U+00A0 are kept.

use bramble_common::warn_once;

use crate::rule::StyleRule;

fn is_stripped(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Parse stylesheet text into rules, in source order.
///
/// Malformed fragments never abort the parse:
/// - a block without `{` is skipped
/// - empty selectors (`a,,b`) are dropped
/// - a declaration without `:` is skipped with a warning
/// - a repeated property name keeps its last value
#[must_use]
pub fn parse_stylesheet(text: &str) -> Vec<StyleRule> {
    let compact: String = text.chars().filter(|&c| !is_stripped(c)).collect();
    let mut rules = Vec::new();

    for block in compact.split('}') {
        // Also covers the empty fragment after the final `}`.
        let Some((selector_text, declaration_text)) = block.split_once('{') else {
            if !block.is_empty() {
                warn_once("CSS", &format!("block without '{{' skipped: {block}"));
            }
            continue;
        };

        let mut rule = StyleRule::new();
        for selector in selector_text.split(',').filter(|s| !s.is_empty()) {
            rule.add_selector(selector);
        }

        for declaration in declaration_text.split(';').filter(|d| !d.is_empty()) {
            match declaration.split_once(':') {
                Some((name, value)) => rule.set_property(name, value),
                None => warn_once(
                    "CSS",
                    &format!("declaration without ':' skipped: {declaration}"),
                ),
            }
        }

        rules.push(rule);
    }

    rules
}

/// Serialize rules back to stylesheet text.
///
/// Each selector line starts at `indent` spaces and declarations sit one
/// `step` deeper.
#[must_use]
pub fn serialize_rules(rules: &[StyleRule], indent: usize, step: usize) -> String {
    let mut out = String::new();
    for rule in rules {
        rule.write_css(&mut out, indent, step);
    }
    out
}
