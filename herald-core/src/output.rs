//! Reply markers and rendering of collected items.
//!
//! Replies travel over a text-message channel, so every public engine
//! operation answers with one of three things: rendered items, a fixed marker,
//! or a line starting with [`ERR_PREFIX`].

use std::fmt::Display;

use serde_json::Value;

/// Reply when nothing new was found.
pub const NO_UPDATE: &str = "No Any Update";
/// Reply when a bulk refresh is handed no sources at all.
pub const NO_SOURCES: &str = "No sources configured";
/// Prefix shared by every failure reply.
pub const ERR_PREFIX: &str = "[ERR]";
/// Character budget for rendered items before truncation.
pub const MAX_REPLY_CHARS: usize = 4000;
/// Appended after the cut when rendered items exceed [`MAX_REPLY_CHARS`].
pub const TRUNCATION_SUFFIX: &str = "\n...[truncated]";

/// Render items as pretty JSON with sorted keys, truncated to the reply budget.
///
/// # Examples
///
/// ```
/// use herald_core::format_items;
/// use serde_json::json;
///
/// # fn main() -> Result<(), serde_json::Error> {
/// let text = format_items(&[json!({"title": "Ünïcode", "id": 1})])?;
/// assert_eq!(text, "[\n  {\n    \"id\": 1,\n    \"title\": \"Ünïcode\"\n  }\n]");
/// # Ok(())
/// # }
/// ```
pub fn format_items(items: &[Value]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items).map(truncate_reply)
}

/// Cut `text` after [`MAX_REPLY_CHARS`] characters and mark the cut.
#[must_use]
pub fn truncate_reply(mut text: String) -> String {
    match text.char_indices().nth(MAX_REPLY_CHARS) {
        Some((cut, _)) => {
            text.truncate(cut);
            text.push_str(TRUNCATION_SUFFIX);
            text
        }
        None => text,
    }
}

/// `[ERR] <name>: <message>`.
#[must_use]
pub fn error_reply(name: &str, message: impl Display) -> String {
    format!("{ERR_PREFIX} {name}: {message}")
}

/// `[ERR] JSON not found: <file>`.
#[must_use]
pub fn not_found_reply(file: &str) -> String {
    format!("{ERR_PREFIX} JSON not found: {file}")
}

/// `[<name>]` followed by the body on the next line.
#[must_use]
pub fn labelled_reply(name: &str, body: &str) -> String {
    format!("[{name}]\n{body}")
}

/// Whether a reply reports a failure.
#[must_use]
pub fn is_error_reply(reply: &str) -> bool {
    reply.starts_with(ERR_PREFIX)
}
