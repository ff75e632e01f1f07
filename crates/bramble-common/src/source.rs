//! Loading markup text from files and byte streams.
//!
//! The parsers only ever see a `&str`. Everything about where the bytes came
//! from, and what can go wrong while reading them, stays in this module.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure while turning a byte source into text.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The stream could not be read, or was not valid UTF-8.
    #[error("failed to read markup source: {0}")]
    Io(#[from] io::Error),

    /// The file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Read a whole stream into text, line by line.
///
/// Every line, including the last, is terminated with `\n`; `\r\n` endings
/// are folded into `\n`.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if reading fails or a line is not valid UTF-8.
pub fn read_to_text<R: Read>(reader: R) -> Result<String, SourceError> {
    let mut text = String::new();
    for line in BufReader::new(reader).lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    Ok(text)
}

/// Read a file into text with [`read_to_text`].
///
/// # Errors
///
/// Returns [`SourceError::Open`] if the file cannot be opened, or
/// [`SourceError::Io`] if reading it fails.
pub fn read_file(path: &Path) -> Result<String, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_to_text(file)
}
