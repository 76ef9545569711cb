//! Word document export
//!
//! Pipeline: Markdown → [`WordDocument`] (one paragraph per line) →
//! WordprocessingML → zip container.
//!
//! # Element Mapping
//!
//! | Markdown line        | Paragraph                               |
//! |----------------------|-----------------------------------------|
//! | blank                | empty paragraph                         |
//! | `#` .. `####` + text | `Heading1` .. `Heading4`, one run        |
//! | `#####` and deeper   | body paragraph, text kept verbatim      |
//! | body                 | plain/bold runs split on `**...**`      |
//!
//! Italics, lists, tables and links are not interpreted; their syntax stays
//! in the text.

mod document;
mod package;

pub use document::{Paragraph, ParagraphStyle, Run, Section, WordDocument};
pub use package::{document_xml, package};

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};

/// Convert Markdown to a packaged `.docx` file.
pub fn to_word_doc(markdown: &str) -> Result<Vec<u8>, FormatError> {
    let doc = WordDocument::from_markdown(markdown);
    let bytes = package(&doc)?;
    tracing::debug!(
        paragraphs = doc.paragraphs().count(),
        bytes = bytes.len(),
        "packaged docx"
    );
    Ok(bytes)
}

/// Format implementation for DOCX
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxFormat;

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Microsoft Word Document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn content_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn serialize_markdown(&self, source: &str) -> Result<SerializedDocument, FormatError> {
        to_word_doc(source).map(SerializedDocument::Binary)
    }
}
