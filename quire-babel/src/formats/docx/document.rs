//! Typed WordprocessingML model
//!
//! Only what the line-oriented encoder produces: one section of paragraphs,
//! each paragraph either body text or a heading, each run plain or bold.

use crate::lines::{classify_lines, split_runs, Emphasis, LineKind, RunStyle};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDocument {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    /// Heading level 1 to 4
    Heading(u8),
}

impl ParagraphStyle {
    /// Style id referenced from `w:pStyle`, `None` for the default style.
    pub fn style_id(&self) -> Option<String> {
        match self {
            ParagraphStyle::Normal => None,
            ParagraphStyle::Heading(level) => Some(format!("Heading{level}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn empty() -> Self {
        Self {
            style: ParagraphStyle::Normal,
            runs: Vec::new(),
        }
    }

    pub fn heading(level: u8, text: &str) -> Self {
        Self {
            style: ParagraphStyle::Heading(level),
            runs: vec![Run::plain(text)],
        }
    }

    pub fn body(runs: Vec<Run>) -> Self {
        Self {
            style: ParagraphStyle::Normal,
            runs,
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    pub fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

impl WordDocument {
    /// Build the document tree for a Markdown source: one paragraph per line.
    pub fn from_markdown(markdown: &str) -> Self {
        let paragraphs = classify_lines(markdown)
            .map(|line| match line {
                LineKind::Blank => Paragraph::empty(),
                LineKind::Heading { level, text } => Paragraph::heading(level, text),
                LineKind::Body(text) => Paragraph::body(
                    split_runs(text, Emphasis::BoldOnly)
                        .into_iter()
                        .map(|run| match run.style {
                            RunStyle::Bold => Run::bold(run.text),
                            RunStyle::Plain | RunStyle::Italic => Run::plain(run.text),
                        })
                        .collect(),
                ),
            })
            .collect();

        Self {
            sections: vec![Section { paragraphs }],
        }
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }
}
