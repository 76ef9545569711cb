//! Shared configuration loader for quire.
//!
//! `defaults/quire.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuireConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quire_babel::formats::pdf::PrintLayout;
use quire_babel::markup::ParserConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/quire.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "quire.toml";

/// Top-level configuration consumed by quire applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuireConfig {
    pub parser: ParserConfig,
    pub export: ExportConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
}

/// Paginated export settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub chrome_bin: Option<PathBuf>,
    pub content_width: u32,
    pub padding: u32,
    pub scale: f32,
}

impl PdfConfig {
    pub fn layout(&self) -> PrintLayout {
        PrintLayout {
            content_width: self.content_width,
            padding: self.padding,
            scale: self.scale,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuireConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuireConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.parser.hard_breaks);
        assert_eq!(config.export.out_dir, PathBuf::from("."));
        assert_eq!(config.pdf.chrome_bin, None);
        assert_eq!(config.pdf.layout(), PrintLayout::default());
    }

    #[test]
    fn partial_parser_section_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quire.toml");
        fs::write(&path, "[parser]\ntables = false\n").unwrap();

        let config = Loader::new().with_file(&path).build().unwrap();
        assert!(!config.parser.tables);
        assert!(config.parser.hard_breaks);
        assert!(config.parser.task_lists);
    }

    #[test]
    fn defaults_match_parser_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parser.hard_breaks", false)
            .expect("override to apply")
            .set_override("pdf.padding", 10)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.parser.hard_breaks);
        assert_eq!(config.pdf.layout().padding, 10);
        assert_eq!(config.pdf.layout().viewport_width(), 820);
    }

    #[test]
    fn layers_partial_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quire.toml");
        fs::write(
            &path,
            "[pdf]\nchrome_bin = \"/opt/chrome\"\n\n[export]\nout_dir = \"out\"\n",
        )
        .unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.pdf.chrome_bin, Some(PathBuf::from("/opt/chrome")));
        assert_eq!(config.export.out_dir, PathBuf::from("out"));
        assert_eq!(config.pdf.content_width, 800);
        assert!(config.parser.tables);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Loader::new()
            .with_file(dir.path().join("absent.toml"))
            .build()
            .is_err());
        assert!(Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .is_ok());
    }
}
