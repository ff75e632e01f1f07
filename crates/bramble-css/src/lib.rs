//! Stylesheet rules for the Bramble markup parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Rule model** - a rule is a set of raw selector strings plus a map of
//!   property names to raw values
//! - **Rule parser** - splits the text of a `<style>` element into rules
//! - **Rule serializer** - renders rules back into stylesheet text
//!
//! # Not Implemented
//!
//! - Tokenization per CSS Syntax; the parser works on plain string splits
//! - Selector matching, specificity, cascade
//! - Typed property values
//! - At-rules, comments, nested blocks

/// Splitting stylesheet text into rules.
pub mod parser;
/// Rule, selector and declaration types.
pub mod rule;

pub use parser::{parse_stylesheet, serialize_rules};
pub use rule::{Declaration, StyleRule};

/// Spaces added per nesting level when rules are serialized on their own.
pub const DEFAULT_INDENT_STEP: usize = 2;
