//! Plain text export
//!
//! Strips Markdown syntax from the raw source with an ordered list of
//! rewrites. Every rule runs on one line at a time, so nothing can match
//! across a line break, and line separators are kept as they are.
//!
//! | Rule | Input               | Output        |
//! |------|---------------------|---------------|
//! | 1    | `## Title`          | `Title`       |
//! | 2    | `**bold**`          | `bold`        |
//! | 3    | `*italic*`          | `italic`      |
//! | 4    | `` `code` ``        | `code`        |
//! | 5    | `![alt](img.png)`   | `alt`         |
//! | 6    | `[label](url)`      | `label`       |
//! | 7    | `- item`, `* item`  | `• item`      |
//! | 8    | `1. item`           | `• item`      |

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use once_cell::sync::Lazy;
use regex::Regex;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

static REWRITES: Lazy<Vec<Rewrite>> = Lazy::new(|| {
    [
        (r"^#{1,6}[ \t]+", ""),
        (r"\*\*(.*?)\*\*", "$1"),
        (r"\*(.*?)\*", "$1"),
        (r"`(.*?)`", "$1"),
        (r"!\[([^\]]*)\]\([^)]+\)", "$1"),
        (r"\[([^\]]+)\]\([^)]+\)", "$1"),
        (r"^[ \t]*[-*+][ \t]+", "• "),
        (r"^[ \t]*\d+\.[ \t]+", "• "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| Rewrite {
        pattern: Regex::new(pattern).expect("valid regex"),
        replacement,
    })
    .collect()
});

/// Strip Markdown formatting, returning plain text.
pub fn to_text(markdown: &str) -> String {
    markdown
        .split('\n')
        .map(strip_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_line(line: &str) -> String {
    REWRITES.iter().fold(line.to_string(), |text, rewrite| {
        rewrite
            .pattern
            .replace_all(&text, rewrite.replacement)
            .into_owned()
    })
}

/// Format implementation for plain text
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "txt"
    }

    fn description(&self) -> &str {
        "Plain Text File"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn content_type(&self) -> &str {
        "text/plain"
    }

    fn serialize_markdown(&self, source: &str) -> Result<SerializedDocument, FormatError> {
        Ok(SerializedDocument::Text(to_text(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headings() {
        assert_eq!(to_text("# Title\n###### Six"), "Title\nSix");
    }

    #[test]
    fn seven_hashes_are_not_a_heading() {
        assert_eq!(to_text("####### x"), "####### x");
    }

    #[test]
    fn collapses_emphasis_and_code() {
        assert_eq!(to_text("a **b** *c* `d` **e**"), "a b c d e");
    }

    #[test]
    fn rewrites_links_and_images() {
        assert_eq!(
            to_text("see [docs](https://x.y) and ![logo](logo.png)"),
            "see docs and logo"
        );
    }

    #[test]
    fn image_with_empty_alt_disappears() {
        assert_eq!(to_text("![](pic.png)"), "");
    }

    #[test]
    fn list_markers_become_bullets() {
        assert_eq!(
            to_text("- one\n* two\n+ three\n  10. four"),
            "• one\n• two\n• three\n• four"
        );
    }

    #[test]
    fn heading_rule_does_not_cross_lines() {
        assert_eq!(to_text("#\nnext"), "#\nnext");
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(to_text("*open\nclose*"), "*open\nclose*");
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Just a sentence.\n\nAnother one, with punctuation!";
        assert_eq!(to_text(text), text);
    }

    #[test]
    fn format_reports_text_output() {
        let out = TextFormat.serialize_markdown("# Hi").unwrap();
        assert_eq!(out, SerializedDocument::Text("Hi".to_string()));
    }
}
