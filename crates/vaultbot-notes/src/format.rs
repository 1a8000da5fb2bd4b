//! Markdown rendering for captured messages.
//!
//! Filenames are timestamped so they sort chronologically and can be
//! matched back to a capture date by prefix. The note body carries the
//! inbox tags on the first line, a metadata block, then the content
//! after a horizontal rule.

use chrono::NaiveDateTime;

/// Filename suffix shared by every capture note.
pub const CAPTURE_SUFFIX: &str = " Telegram Capture.md";

/// Timestamped filename: `YYYY-MM-DD-HHMMSS Telegram Capture.md`.
pub fn generate_filename(captured_at: NaiveDateTime) -> String {
    format!("{}{}", captured_at.format("%Y-%m-%d-%H%M%S"), CAPTURE_SUFFIX)
}

/// Render a captured message as a markdown note.
pub fn format_note(content: &str, captured_at: NaiveDateTime, forward_from: Option<&str>) -> String {
    let mut lines = vec![
        "#inbox #telegram-capture".to_string(),
        String::new(),
        format!("**Captured**: {}", captured_at.format("%Y-%m-%d %H:%M:%S")),
        "**Source**: Telegram".to_string(),
    ];

    if let Some(source) = forward_from {
        lines.push(format!("**Forwarded from**: {source}"));
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(content.to_string());

    lines.join("\n")
}
