//! Renderer warnings, deduplicated and routed through the `log` facade.
//!
//! Used by the style, model, and layer crates to report recoverable problems
//! in a document (malformed property values, unknown template fields,
//! incomplete overlays) without aborting a render pass.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Log target shared by every kmlayer warning.
pub const LOG_TARGET: &str = "kmlayer";

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable document problem (emitted once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("style", "unknown template variable $[population]");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        log::warn!(target: LOG_TARGET, "[{component}] {message}");
    }
}

/// Returns true if `message` has already been emitted for `component`.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when loading a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
