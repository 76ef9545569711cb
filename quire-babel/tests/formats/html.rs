//! HTML file export: sanitization and document shell

use crate::common::fixture;
use once_cell::sync::Lazy;
use quire_babel::formats::html::to_html_file;
use quire_babel::markup::{parse_with, ParserConfig};
use quire_babel::FormatRegistry;
use regex::Regex;

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<style>.*?</style>").unwrap());

fn render(name: &str) -> String {
    let markup = parse_with(&fixture(name), &ParserConfig::default()).unwrap();
    to_html_file(&markup)
}

#[test]
fn test_hostile_input_is_neutralized() {
    let html = STYLE_BLOCK.replace(&render("hostile.md"), "").into_owned();
    let lower = html.to_lowercase();
    assert!(!lower.contains("<script"));
    assert!(!lower.contains("onerror"));
    assert!(!lower.contains("onclick"));
    assert!(!lower.contains("javascript:"));
    assert!(!lower.contains("frame"));
    assert!(html.contains("<h1>Safe title</h1>"));
    assert!(html.contains(r#"href="https://example.com""#));
    assert!(html.contains("ok link"));
    assert!(html.contains(r#"src="x.png""#));
}

#[test]
fn test_tables_survive() {
    let html = render("hostile.md");
    assert!(html.contains("<table>"));
    assert!(html.contains("<th>a</th>"));
    assert!(html.contains("<td>2</td>"));
}

#[test]
fn test_kitchensink_structure() {
    let html = render("kitchensink.md");
    assert!(html.contains("<h1>Quarterly Notes</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains("<em>italic</em>"));
    assert!(html.contains("<code>code</code>"));
    assert!(html.contains(r#"<a href="https://example.com">docs</a>"#));
    assert!(html.contains("<h5>Too deep</h5>"));
}

#[test]
fn test_registry_html_is_a_full_document() {
    let bytes = FormatRegistry::with_defaults()
        .render("html", "# Hi")
        .unwrap()
        .into_bytes();
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Markdown Document</title>"));
}
