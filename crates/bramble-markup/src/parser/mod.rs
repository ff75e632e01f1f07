//! Markup parser module for tree construction.

/// Tree builder consuming the token list.
pub mod tree_builder;

pub use tree_builder::TreeBuilder;
