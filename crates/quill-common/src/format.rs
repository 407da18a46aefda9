//! Response formatting against Discord's message size ceilings.
//!
//! Every length here is measured in `char`s, which is how Discord counts
//! message and embed sizes.

use chrono::{DateTime, Utc};

/// Maximum length of plain message content.
pub const MESSAGE_CONTENT_LIMIT: usize = 2000;
/// Maximum length of an embed description.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;
/// Maximum length of an embed title.
pub const EMBED_TITLE_LIMIT: usize = 256;
/// Maximum length of an embed field name.
pub const FIELD_NAME_LIMIT: usize = 256;
/// Maximum length of an embed field value.
pub const FIELD_VALUE_LIMIT: usize = 1024;
/// Maximum length of an embed footer.
pub const FOOTER_LIMIT: usize = 2048;

const ELLIPSIS: &str = "...";

/// Clips `text` to at most `max_length` characters.
///
/// Oversized input keeps its first `max_length - 3` characters followed by
/// `...`. Below three characters there is no room for the marker, so the text
/// is cut to `max_length` instead.
pub fn format(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_length < marker_len {
        return text.chars().take(max_length).collect();
    }

    let mut clipped: String = text.chars().take(max_length - marker_len).collect();
    clipped.push_str(ELLIPSIS);
    clipped
}

/// Clips an embed field's name and value independently.
///
/// Returns `None` when either side is blank after trimming, since Discord
/// rejects embeds with empty fields; callers skip the field.
pub fn format_field(
    name: &str,
    value: &str,
    name_limit: usize,
    value_limit: usize,
) -> Option<(String, String)> {
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }

    let name = format(name, name_limit);
    let value = format(value, value_limit);
    if name.is_empty() || value.is_empty() {
        return None;
    }

    Some((name, value))
}

/// Neutralises markdown and mentions in untrusted text.
///
/// Markdown control characters are backslash-escaped and mention syntax is
/// broken with a zero-width space so echoed prompts cannot ping anyone.
/// Headings (`#`, `-#`) and list markers only act at the start of a line,
/// so `#` and `-` are escaped there.
pub fn escape_markdown(text: &str) -> String {
    const ZWSP: char = '\u{200B}';

    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut line_start = true;
    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '_' | '~' | '`' | '|' | '>' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '#' | '-' if line_start => {
                escaped.push('\\');
                escaped.push(c);
            }
            '@' => {
                escaped.push('@');
                escaped.push(ZWSP);
            }
            '<' if matches!(chars.peek(), Some('@' | '#')) => {
                escaped.push('<');
                escaped.push(ZWSP);
            }
            _ => escaped.push(c),
        }
        line_start = c == '\n' || (line_start && c.is_whitespace());
    }
    escaped
}

/// Discord markup rendering `timestamp` relative to the reader ("in an hour").
pub fn relative_timestamp(timestamp: DateTime<Utc>) -> String {
    format!("<t:{}:R>", timestamp.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_short_text_untouched() {
        assert_eq!(format("Short", 20), "Short");
        assert_eq!(format("", 20), "");
    }

    #[test]
    fn test_format_truncates_with_marker() {
        let input = "This is a very long string that should be truncated";
        assert_eq!(format(input, 20), "This is a very lo...");
    }

    #[test]
    fn test_format_exact_limit_untouched() {
        let input = "x".repeat(4096);
        assert_eq!(format(&input, 4096), input);
    }

    #[test]
    fn test_format_reply_ceiling() {
        let input = "y".repeat(5000);
        let out = format(&input, 4096);

        assert_eq!(out.chars().count(), 4096);
        assert!(out.starts_with(&"y".repeat(4093)));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_format_multibyte() {
        let input = "日本語のテキスト";
        let out = format(input, 5);
        assert_eq!(out, "日本...");
    }

    #[test]
    fn test_format_tiny_limit() {
        assert_eq!(format("abcdef", 2), "ab");
        assert_eq!(format("abcdef", 0), "");
    }

    #[test]
    fn test_format_field_skips_blank() {
        assert!(format_field("  ", "value", 256, 1024).is_none());
        assert!(format_field("Prompt", "\n\t", 256, 1024).is_none());
    }

    #[test]
    fn test_format_field_limits_each_side() {
        let (name, value) = format_field("Name", &"v".repeat(2000), 256, 1024).unwrap();
        assert_eq!(name, "Name");
        assert_eq!(value.chars().count(), 1024);
        assert!(value.ends_with("..."));
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("**bold**"), "\\*\\*bold\\*\\*");
        assert_eq!(escape_markdown("a_b"), "a\\_b");
        assert_eq!(escape_markdown("> quote"), "\\> quote");
    }

    #[test]
    fn test_escape_line_start_headings() {
        assert_eq!(escape_markdown("# Title"), "\\# Title");
        assert_eq!(escape_markdown("-# small"), "\\-# small");
        assert_eq!(escape_markdown("ok\n  ## sub"), "ok\n  \\## sub");
        assert_eq!(escape_markdown("- item"), "\\- item");
        assert_eq!(escape_markdown("issue #4 - done"), "issue #4 - done");
    }

    #[test]
    fn test_escape_masked_links() {
        assert_eq!(
            escape_markdown("[click](https://example.com)"),
            "\\[click\\](https://example.com)"
        );
    }

    #[test]
    fn test_escape_mentions() {
        let escaped = escape_markdown("hi @everyone and <@123> in <#456>");
        assert!(!escaped.contains("@everyone"));
        assert!(!escaped.contains("<@123>"));
        assert!(!escaped.contains("<#456>"));
        assert!(escaped.contains("@\u{200B}everyone"));
    }

    #[test]
    fn test_relative_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(relative_timestamp(timestamp), "<t:1704067200:R>");
    }
}
