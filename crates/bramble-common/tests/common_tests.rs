//! Tests for source loading and the warning registry.

use std::io::{self, Read};
use std::path::Path;

use bramble_common::warning::{MAX_MESSAGE_CHARS, has_warned};
use bramble_common::{SourceError, read_file, read_to_text, set_quiet, warn_once};

/// A reader that fails on first use.
struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device unplugged"))
    }
}

#[test]
fn test_read_to_text_terminates_every_line() {
    let text = read_to_text("<div>\r\n  <p>hi</p>\n</div>".as_bytes()).unwrap();
    assert_eq!(text, "<div>\n  <p>hi</p>\n</div>\n");
}

#[test]
fn test_read_to_text_empty_stream() {
    let text = read_to_text(io::empty()).unwrap();
    assert!(text.is_empty());
}

#[test]
fn test_read_to_text_propagates_io_errors() {
    let err = read_to_text(BrokenReader).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
    assert!(err.to_string().contains("device unplugged"));
}

#[test]
fn test_read_to_text_rejects_invalid_utf8() {
    let bytes: &[u8] = &[b'<', b'a', b'>', 0xff, 0xfe, b'\n'];
    assert!(matches!(read_to_text(bytes), Err(SourceError::Io(_))));
}

#[test]
fn test_read_file_missing_path() {
    let err = read_file(Path::new("/definitely/not/here.xml")).unwrap_err();
    match err {
        SourceError::Open { path, .. } => {
            assert_eq!(path, Path::new("/definitely/not/here.xml"));
        }
        SourceError::Io(_) => panic!("Expected Open error"),
    }
}

#[test]
fn test_warn_once_records_warning() {
    set_quiet(true);
    assert!(!has_warned("Test", "first sighting"));
    warn_once("Test", "first sighting");
    warn_once("Test", "first sighting");
    assert!(has_warned("Test", "first sighting"));
    assert!(!has_warned("Other", "first sighting"));
}

#[test]
fn test_long_warnings_are_cut() {
    set_quiet(true);
    let prefix = "é".repeat(MAX_MESSAGE_CHARS);
    warn_once("Long", &format!("{prefix} first tail"));
    // Only the first MAX_MESSAGE_CHARS characters are kept.
    assert!(has_warned("Long", &format!("{prefix} other tail")));
    assert!(!has_warned("Long", &prefix[..prefix.len() - 2]));
}
