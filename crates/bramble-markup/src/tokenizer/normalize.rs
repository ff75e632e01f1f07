//! Splitting raw markup into trimmed lines with one tag or text run each.

use std::sync::LazyLock;

use regex::Regex;

/// Everything between the first `>` and the last `<` of a line.
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">(.*)<").expect("valid regex"));

/// A `>` directly followed by more text on the same line.
static AFTER_TAG_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">(.)").expect("valid regex"));

/// A `<` directly preceded by text on the same line.
static BEFORE_TAG_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)<").expect("valid regex"));

/// Force every `<` and `>` boundary onto its own line, then split and trim.
///
/// The three passes run in order over the whole text:
/// 1. `>(.*)<` becomes `>\n$1\n<`
/// 2. `>(.)` becomes `>\n$1`
/// 3. `(.)<` becomes `$1\n<`
///
/// `.` never matches a newline, so every pass works line by line. Blank lines
/// are kept as empty strings; the tokenizer skips them.
#[must_use]
pub fn normalize_lines(input: &str) -> Vec<String> {
    let text = BETWEEN_TAGS.replace_all(input, ">\n${1}\n<");
    let text = AFTER_TAG_END.replace_all(&text, ">\n${1}");
    let text = BEFORE_TAG_START.replace_all(&text, "${1}\n<");
    text.split('\n').map(|line| line.trim().to_string()).collect()
}
