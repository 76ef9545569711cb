//! Line-oriented Markdown model shared by the RTF and DOCX encoders
//!
//! Both encoders work per physical line: a line is either blank, a heading of
//! level 1 to 4, or body text. Body text is further split into inline runs on
//! emphasis delimiters. Keeping the policy here guarantees the two encoders
//! agree on the heading cutoff: `#####` and deeper are body text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Deepest heading level recognised by the line-oriented encoders.
pub const MAX_HEADING_LEVEL: u8 = 4;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static BOLD_OR_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*|\*(.*?)\*").expect("valid regex"));

/// Classification of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Body(&'a str),
}

/// Classify a single line (without its trailing newline).
///
/// A heading is 1 to [`MAX_HEADING_LEVEL`] `#` characters followed by a space.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if (1..=MAX_HEADING_LEVEL as usize).contains(&hashes) {
        if let Some(text) = line[hashes..].strip_prefix(' ') {
            return LineKind::Heading {
                level: hashes as u8,
                text,
            };
        }
    }

    LineKind::Body(line)
}

/// Split a document into lines and classify each of them.
///
/// Splits on `'\n'` only, so `n` newlines always give `n + 1` lines.
pub fn classify_lines(source: &str) -> impl Iterator<Item = LineKind<'_>> {
    source.split('\n').map(classify_line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle {
    Plain,
    Bold,
    Italic,
}

/// A styled span of text within one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun<'a> {
    pub text: &'a str,
    pub style: RunStyle,
}

impl<'a> InlineRun<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            style: RunStyle::Plain,
        }
    }

    pub fn bold(text: &'a str) -> Self {
        Self {
            text,
            style: RunStyle::Bold,
        }
    }

    pub fn italic(text: &'a str) -> Self {
        Self {
            text,
            style: RunStyle::Italic,
        }
    }
}

/// Which delimiters [`split_runs`] recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// `**bold**` only; single asterisks stay literal
    BoldOnly,
    /// `**bold**` and `*italic*`
    BoldAndItalic,
}

/// Split a body line into styled runs.
///
/// Delimiter pairs are matched non-greedily, so the first closing delimiter
/// wins. Text between matches becomes plain runs; empty plain runs are
/// skipped while styled runs are always kept, even when empty. A line that
/// yields no runs at all falls back to a single plain run.
pub fn split_runs(line: &str, emphasis: Emphasis) -> Vec<InlineRun<'_>> {
    let pattern = match emphasis {
        Emphasis::BoldOnly => &*BOLD,
        Emphasis::BoldAndItalic => &*BOLD_OR_ITALIC,
    };

    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in pattern.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            runs.push(InlineRun::plain(&line[cursor..whole.start()]));
        }
        if let Some(bold) = caps.get(1) {
            runs.push(InlineRun::bold(bold.as_str()));
        } else if let Some(italic) = caps.get(2) {
            runs.push(InlineRun::italic(italic.as_str()));
        }
        cursor = whole.end();
    }

    if cursor < line.len() {
        runs.push(InlineRun::plain(&line[cursor..]));
    }

    if runs.is_empty() {
        runs.push(InlineRun::plain(line));
    }

    runs
}
