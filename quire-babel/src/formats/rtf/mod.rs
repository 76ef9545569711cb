//! Rich Text Format export
//!
//! A minimal RTF container: one font table entry, then one paragraph unit per
//! source line. Lines are classified with [`crate::lines::classify_line`] and
//! body lines are split into bold/italic runs with
//! [`crate::lines::split_runs`].
//!
//! | Line          | RTF                                          |
//! |---------------|----------------------------------------------|
//! | blank         | `\par `                                      |
//! | `# text`      | `\par \b \fs28 text\b0 \fs24 \par `          |
//! | `## text`     | `\par \b \fs26 text\b0 \fs24 \par `          |
//! | `### text`    | `\par \b \fs24 text\b0 \par `                |
//! | `#### text`   | same as `###`                                |
//! | body          | runs, then `\par `                           |
//!
//! Text is escaped: `\`, `{` and `}` get a backslash, non-ASCII characters
//! become `\uN?` escapes over their UTF-16 code units.

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::lines::{classify_lines, split_runs, Emphasis, LineKind, RunStyle};
use std::fmt::Write as _;

const HEADER: &str = r"{\rtf1\ansi\deff0 {\fonttbl {\f0 Times New Roman;}}";
const FOOTER: &str = "}";

/// Convert Markdown to an RTF document.
pub fn to_rtf(markdown: &str) -> String {
    let mut rtf = String::with_capacity(HEADER.len() + markdown.len() * 2);
    rtf.push_str(HEADER);

    for line in classify_lines(markdown) {
        match line {
            LineKind::Blank => rtf.push_str(r"\par "),
            LineKind::Heading { level, text } => push_heading(&mut rtf, level, text),
            LineKind::Body(text) => {
                for run in split_runs(text, Emphasis::BoldAndItalic) {
                    match run.style {
                        RunStyle::Plain => push_escaped(&mut rtf, run.text),
                        RunStyle::Bold => {
                            rtf.push_str(r"\b ");
                            push_escaped(&mut rtf, run.text);
                            rtf.push_str(r"\b0 ");
                        }
                        RunStyle::Italic => {
                            rtf.push_str(r"\i ");
                            push_escaped(&mut rtf, run.text);
                            rtf.push_str(r"\i0 ");
                        }
                    }
                }
                rtf.push_str(r"\par ");
            }
        }
    }

    rtf.push_str(FOOTER);
    rtf
}

fn push_heading(rtf: &mut String, level: u8, text: &str) {
    // Level 3 and 4 are already body size, so there is nothing to reset.
    let (size, reset) = match level {
        1 => (r"\fs28 ", r"\fs24 "),
        2 => (r"\fs26 ", r"\fs24 "),
        _ => (r"\fs24 ", ""),
    };
    rtf.push_str(r"\par \b ");
    rtf.push_str(size);
    push_escaped(rtf, text);
    rtf.push_str(r"\b0 ");
    rtf.push_str(reset);
    rtf.push_str(r"\par ");
}

/// Append `text` with RTF control characters neutralized.
fn push_escaped(rtf: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' | '{' | '}' => {
                rtf.push('\\');
                rtf.push(ch);
            }
            c if c.is_ascii() => rtf.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // RTF \u takes a signed 16-bit value; `?` is the ANSI fallback.
                    let _ = write!(rtf, "\\u{}?", *unit as i16);
                }
            }
        }
    }
}

/// Format implementation for RTF
#[derive(Debug, Default, Clone, Copy)]
pub struct RtfFormat;

impl Format for RtfFormat {
    fn name(&self) -> &str {
        "rtf"
    }

    fn description(&self) -> &str {
        "Rich Text Format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["rtf"]
    }

    fn content_type(&self) -> &str {
        "application/rtf"
    }

    fn serialize_markdown(&self, source: &str) -> Result<SerializedDocument, FormatError> {
        let rtf = to_rtf(source);
        tracing::debug!(lines = source.split('\n').count(), bytes = rtf.len(), "encoded rtf");
        Ok(SerializedDocument::Text(rtf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(rtf: &str) -> &str {
        rtf.strip_prefix(HEADER)
            .and_then(|s| s.strip_suffix(FOOTER))
            .unwrap()
    }

    #[test]
    fn wraps_in_header_and_footer() {
        let rtf = to_rtf("hello");
        assert!(rtf.starts_with(r"{\rtf1\ansi\deff0 {\fonttbl {\f0 Times New Roman;}}"));
        assert!(rtf.ends_with('}'));
        assert_eq!(body(&rtf), r"hello\par ");
    }

    #[test]
    fn blank_line_is_paragraph_break() {
        assert_eq!(body(&to_rtf("a\n\nb")), r"a\par \par b\par ");
    }

    #[test]
    fn heading_sizes() {
        assert_eq!(body(&to_rtf("# One")), r"\par \b \fs28 One\b0 \fs24 \par ");
        assert_eq!(body(&to_rtf("## Two")), r"\par \b \fs26 Two\b0 \fs24 \par ");
        assert_eq!(body(&to_rtf("### Three")), r"\par \b \fs24 Three\b0 \par ");
        assert_eq!(body(&to_rtf("#### Four")), r"\par \b \fs24 Four\b0 \par ");
    }

    #[test]
    fn level_five_heading_is_body_text() {
        assert_eq!(body(&to_rtf("##### Five")), r"##### Five\par ");
    }

    #[test]
    fn inline_bold_and_italic() {
        assert_eq!(
            body(&to_rtf("plain **bold** and *it*")),
            r"plain \b bold\b0  and \i it\i0 \par "
        );
    }

    #[test]
    fn escapes_control_characters() {
        assert_eq!(body(&to_rtf(r"a {b} \c")), r"a \{b\} \\c\par ");
    }

    #[test]
    fn escapes_unicode() {
        assert_eq!(body(&to_rtf("café")), r"caf\u233?\par ");
        // U+1F600 → surrogate pair D83D DE00
        assert_eq!(body(&to_rtf("😀")), r"\u-10179?\u-8704?\par ");
    }

    #[test]
    fn braces_stay_balanced() {
        let rtf = to_rtf("# {Title}\n}}} **{bold}**\n{{{");
        let opens = rtf.matches('{').count() - rtf.matches(r"\{").count();
        let closes = rtf.matches('}').count() - rtf.matches(r"\}").count();
        assert_eq!(opens, closes);
    }
}
