//! Pulls the structured action block out of a model reply.
//!
//! The model is asked to append a fenced ```json block holding an array of
//! action objects. Only the first block counts; a malformed block is treated
//! as absent, because the conversation must not fail on bad model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// First fenced ```json block containing a JSON array of objects.
static ACTION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json\s*(\[\s*\{[\s\S]*?\}\s*\])\s*```").expect("action block pattern")
});

/// Everything from the first ```json fence to the last closing fence.
static ACTION_BLOCK_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json[\s\S]*```").expect("action strip pattern"));

/// Extract the action array from `reply`, if present and well formed.
///
/// Elements stay as raw JSON values; the executor decodes each one inside
/// its own failure boundary so one bad element cannot drop its siblings.
pub fn extract_actions(reply: &str) -> Option<Vec<Value>> {
    let captures = ACTION_BLOCK.captures(reply)?;
    let raw = captures.get(1)?.as_str();

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(actions)) if !actions.is_empty() => Some(actions),
        Ok(_) => None,
        Err(err) => {
            warn!("Failed to parse action block: {err}");
            None
        }
    }
}

/// The speakable form of a reply: structured block removed, then trimmed.
pub fn strip_action_block(reply: &str) -> String {
    ACTION_BLOCK_STRIP.replace_all(reply, "").trim().to_string()
}
