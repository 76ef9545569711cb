//! Markdown → sanitized HTML
//!
//! Markdown rendering is delegated to `comrak` with the GFM extensions enabled.
//! Raw HTML embedded in the source is passed through by comrak and then
//! cleaned by [`sanitize`], which walks an html5ever DOM and strips active
//! content. The result is wrapped in [`SanitizedMarkup`], the only type the
//! HTML-consuming encoders accept.
//!
//! # Configuration
//!
//! Line-break and extension behavior is a process-wide setting. It may be set
//! once through [`configure`] before the first parse; after that it is fixed.
//! [`parse_with`] takes an explicit configuration for callers (and tests) that
//! must not depend on the global.

mod sanitize;

use crate::error::FormatError;
use comrak::{markdown_to_html, ComrakOptions};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use sanitize::sanitize_html;

static PARSER_CONFIG: OnceCell<ParserConfig> = OnceCell::new();

/// Knobs passed to the Markdown engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Render single newlines inside a paragraph as `<br>`
    pub hard_breaks: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub autolinks: bool,
    pub task_lists: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            tables: true,
            strikethrough: true,
            autolinks: true,
            task_lists: true,
        }
    }
}

impl ParserConfig {
    fn comrak_options(&self) -> ComrakOptions<'static> {
        let mut options = ComrakOptions::default();
        options.extension.table = self.tables;
        options.extension.strikethrough = self.strikethrough;
        options.extension.autolink = self.autolinks;
        options.extension.tasklist = self.task_lists;
        options.render.hardbreaks = self.hard_breaks;
        // Raw HTML reaches the sanitizer instead of being replaced by comrak.
        options.render.unsafe_ = true;
        options
    }
}

/// Fix the process-wide parser configuration.
///
/// Fails with [`FormatError::AlreadyConfigured`] if a configuration was set
/// before or if a parse already ran with the defaults.
pub fn configure(config: ParserConfig) -> Result<(), FormatError> {
    PARSER_CONFIG
        .set(config)
        .map_err(|_| FormatError::AlreadyConfigured)
}

/// The configuration [`parse`] uses. Reading it fixes it.
pub fn parser_config() -> &'static ParserConfig {
    PARSER_CONFIG.get_or_init(ParserConfig::default)
}

/// HTML that went through [`sanitize_html`].
///
/// Never contains script elements, event-handler attributes, or
/// `javascript:` URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedMarkup(String);

impl SanitizedMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for SanitizedMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse Markdown with the process-wide configuration.
pub fn parse(markdown: &str) -> Result<SanitizedMarkup, FormatError> {
    parse_with(markdown, parser_config())
}

/// Parse Markdown with an explicit configuration.
pub fn parse_with(markdown: &str, config: &ParserConfig) -> Result<SanitizedMarkup, FormatError> {
    let options = config.comrak_options();
    let html = markdown_to_html(markdown, &options);
    let clean = sanitize_html(&html)?;
    tracing::debug!(
        source_len = markdown.len(),
        raw_len = html.len(),
        clean_len = clean.len(),
        "rendered markdown"
    );
    Ok(SanitizedMarkup(clean))
}
