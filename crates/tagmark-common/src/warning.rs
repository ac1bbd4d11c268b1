//! Pipeline warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! The tokenizer reports recovered input irregularities through here; the
//! caller still gets a tree back.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about recovered input (prints once per unique message).
///
/// Returns `true` if the message was printed, `false` if it had already
/// been reported.
///
/// # Example
/// ```ignore
/// warn_once("Tokenizer", "unmatched '}' at byte 12");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[tagmark {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
