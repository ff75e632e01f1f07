//! Markup tokenizer module.
//!
//! The input is first normalized so that every tag sits on its own line,
//! then each line becomes one token.

/// Line tokenizer producing start tag, end tag and text tokens.
pub mod line_tokenizer;
/// Line normalization applied before tokenizing.
pub mod normalize;
/// Token types produced by the tokenizer.
pub mod token;

pub use line_tokenizer::MarkupTokenizer;
pub use normalize::normalize_lines;
pub use token::Token;
