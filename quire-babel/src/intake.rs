//! Which input files are accepted as Markdown sources

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

pub const UNSUPPORTED_MESSAGE: &str = "Please select a valid Markdown file (.md, .markdown, .txt)";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please select a valid Markdown file (.md, .markdown, .txt)")]
    Unsupported(String),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Lower-cased text after the last `.`, or an empty string.
pub fn file_extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Accepts `.md`, `.markdown` and `.txt` names, or a `text/markdown` type.
pub fn is_markdown_file(name: &str, content_type: Option<&str>) -> bool {
    MARKDOWN_EXTENSIONS.contains(&file_extension(name).as_str())
        || content_type == Some(MARKDOWN_CONTENT_TYPE)
}

/// Read a Markdown file, returning its content and file name.
pub fn read_markdown_file(path: &Path) -> Result<(String, String), IntakeError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_markdown_file(&name, None) {
        return Err(IntakeError::Unsupported(name));
    }
    let content = fs::read_to_string(path).map_err(|source| IntakeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(file = %name, bytes = content.len(), "read markdown file");
    Ok((content, name))
}
