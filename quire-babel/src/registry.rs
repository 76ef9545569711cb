//! Named encoders
//!
//! The dispatcher looks encoders up by the canonical name of an export format
//! (`pdf`, `docx`, `html`, `txt`, `rtf`).

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::markup;
use std::collections::HashMap;
use std::path::Path;

/// Registry of export formats
///
/// Formats are keyed by [`Format::name`]. Registering a second format under
/// the same name replaces the first, which is how callers swap in a
/// differently configured PDF rasterizer.
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let rtf = registry.render("rtf", "# Title")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Add an encoder, replacing any encoder registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        if self.formats.insert(name.clone(), Box::new(format)).is_some() {
            tracing::debug!(format = %name, "replaced registered encoder");
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the encoder whose extensions include the file's extension.
    ///
    /// The comparison ignores case, so `REPORT.DOCX` maps to `docx`.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Encode Markdown with the named format.
    ///
    /// Encoders that consume markup get the source run through
    /// [`markup::parse`] first, using the process-wide parser configuration.
    pub fn render(&self, format: &str, markdown: &str) -> Result<SerializedDocument, FormatError> {
        let encoder = self.get(format)?;
        if !encoder.requires_markup() {
            return encoder.serialize_markdown(markdown);
        }
        let markup = markup::parse(markdown)?;
        encoder.serialize_markup(&markup)
    }

    /// Registry holding every built-in encoder.
    ///
    /// Without the `native-export` feature there is no default rasterizer, so
    /// `pdf` is absent until the caller registers a [`PdfFormat`] itself.
    ///
    /// [`PdfFormat`]: crate::formats::PdfFormat
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "native-export")]
        registry.register(crate::formats::PdfFormat::default());
        registry.register(crate::formats::DocxFormat);
        registry.register(crate::formats::HtmlFormat);
        registry.register(crate::formats::TextFormat);
        registry.register(crate::formats::RtfFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
