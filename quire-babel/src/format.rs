//! Format trait definition
//!
//! Every encoder implements [`Format`]. An encoder consumes either the raw
//! Markdown source or the sanitized markup produced by [`crate::markup`];
//! [`Format::requires_markup`] tells the caller which one to hand over.

use crate::error::FormatError;
use crate::markup::SanitizedMarkup;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedDocument {
    /// UTF-8 text output (HTML, plain text, RTF)
    Text(String),
    /// Binary output (DOCX, PDF)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SerializedDocument::Text(text) => text.len(),
            SerializedDocument::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for export formats
///
/// Line-oriented encoders (text, RTF, DOCX) override [`Format::serialize_markdown`].
/// HTML-consuming encoders (HTML file, PDF) return `true` from
/// [`Format::requires_markup`] and override [`Format::serialize_markup`].
///
/// # Examples
///
/// ```ignore
/// struct Shout;
///
/// impl Format for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn content_type(&self) -> &str {
///         "text/plain"
///     }
///
///     fn serialize_markdown(&self, source: &str) -> Result<SerializedDocument, FormatError> {
///         Ok(SerializedDocument::Text(source.to_uppercase()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "pdf", "docx", "txt")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// The first entry is the canonical extension used for exported files.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// MIME type of the produced bytes
    fn content_type(&self) -> &str {
        "application/octet-stream"
    }

    /// Whether the encoder consumes sanitized markup instead of raw Markdown
    fn requires_markup(&self) -> bool {
        false
    }

    /// Encode raw Markdown.
    ///
    /// Default implementation returns NotSupported error.
    fn serialize_markdown(&self, _source: &str) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not encode raw Markdown",
            self.name()
        )))
    }

    /// Encode sanitized markup.
    ///
    /// Default implementation returns NotSupported error.
    fn serialize_markup(
        &self,
        _markup: &SanitizedMarkup,
    ) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not encode HTML markup",
            self.name()
        )))
    }
}
