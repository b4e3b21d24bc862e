//! Complaint summaries: a fixed-length prefix of the text.

/// Appended when the summary cuts the complaint short.
pub const ELLIPSIS: &str = "...";

/// First `max_chars` characters of `text`, plus an ellipsis when anything was cut.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-codepoint.
/// Cuts mid-word.
pub fn summarize(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
