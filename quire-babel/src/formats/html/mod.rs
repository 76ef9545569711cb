//! Standalone HTML export
//!
//! Wraps sanitized markup in a complete HTML5 document:
//!
//! - doctype, `lang="en"`, charset and viewport meta tags
//! - the fixed title `Markdown Document`
//! - the embedded stylesheet from `css/export.css` (typography, headings,
//!   code, blockquotes, tables)
//! - the markup itself, verbatim, inside `<body>`
//!
//! There is no parsing here; the markup is already sanitized by
//! [`crate::markup::parse`].

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::markup::SanitizedMarkup;

pub const DOCUMENT_TITLE: &str = "Markdown Document";

const EXPORT_CSS: &str = include_str!("../../../css/export.css");

/// The stylesheet embedded into exported HTML files.
pub fn get_default_css() -> &'static str {
    EXPORT_CSS
}

/// Wrap sanitized markup in a standalone HTML document.
pub fn to_html_file(markup: &SanitizedMarkup) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{DOCUMENT_TITLE}</title>
    <style>
{EXPORT_CSS}    </style>
</head>
<body>
    {markup}
</body>
</html>"#
    )
}

/// Format implementation for standalone HTML files
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Web Page Format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn content_type(&self) -> &str {
        "text/html"
    }

    fn requires_markup(&self) -> bool {
        true
    }

    fn serialize_markup(&self, markup: &SanitizedMarkup) -> Result<SerializedDocument, FormatError> {
        Ok(SerializedDocument::Text(to_html_file(markup)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{parse_with, ParserConfig};

    fn markup(md: &str) -> SanitizedMarkup {
        parse_with(md, &ParserConfig::default()).unwrap()
    }

    #[test]
    fn wraps_markup_in_document() {
        let html = to_html_file(&markup("# Hi"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains(r#"<meta name="viewport""#));
        assert!(html.contains("<title>Markdown Document</title>"));
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn embeds_stylesheet_selectors() {
        let html = to_html_file(&markup("text"));
        for selector in ["h1, h2 {", "code {", "pre {", "blockquote {", "table {", "th, td {"] {
            assert!(html.contains(selector), "missing selector {selector}");
        }
    }

    #[test]
    fn markup_is_inserted_verbatim() {
        let m = markup("a **b**");
        let html = to_html_file(&m);
        assert!(html.contains(m.as_str()));
    }

    #[test]
    fn format_requires_markup() {
        assert!(HtmlFormat.requires_markup());
        assert!(HtmlFormat.serialize_markdown("# x").is_err());
    }
}
