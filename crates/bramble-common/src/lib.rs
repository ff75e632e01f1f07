//! Common utilities for the Bramble markup parser.
//!
//! This crate provides shared infrastructure used by all parser components:
//! - **Warning System** - deduplicated colored diagnostics for tolerated input
//! - **Source Loading** - turning byte streams into the text the parsers consume

pub mod source;
pub mod warning;

pub use source::{SourceError, read_file, read_to_text};
pub use warning::{clear_warnings, set_quiet, warn_once};
