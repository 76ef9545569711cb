//! Error types for format operations

use thiserror::Error;

/// Errors that can occur while parsing Markdown or encoding an export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The format cannot handle the requested input
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Markdown → markup conversion failed
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Offscreen rendering or rasterization failed
    #[error("Render error: {0}")]
    RenderError(String),
    /// Binary container assembly failed (DOCX zip, PDF objects)
    #[error("Packaging error: {0}")]
    PackagingError(String),
    /// Parser configuration was set after it became fixed
    #[error("Parser configuration is already fixed for this process")]
    AlreadyConfigured,
}
