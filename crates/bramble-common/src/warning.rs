//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the markup tree builder and the stylesheet parser to report input
//! they tolerated instead of rejecting.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still recorded but nothing is printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Longest message excerpt kept and printed, in characters.
pub const MAX_MESSAGE_CHARS: usize = 120;

/// Cut `message` to [`MAX_MESSAGE_CHARS`], marking the cut with `...`.
fn excerpt(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {}", excerpt(message))
}

/// Warn about tolerated input (prints once per unique message)
///
/// Messages longer than [`MAX_MESSAGE_CHARS`] are cut, so echoed input does
/// not pile up in the dedup set; two messages sharing that prefix count as
/// one.
///
/// # Example
/// ```
/// bramble_common::warn_once("CSS", "declaration without ':' skipped: color");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print && !QUIET.load(Ordering::Relaxed) {
        let message = excerpt(message);
        eprintln!("{}", format!("[Bramble {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already recorded this exact warning.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Silence (or re-enable) printing of warnings.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
