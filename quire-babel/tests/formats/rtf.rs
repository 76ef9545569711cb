//! RTF export over full documents

use crate::common::fixture;
use insta::assert_snapshot;
use quire_babel::formats::rtf::to_rtf;

#[test]
fn test_small_document_rtf() {
    let rtf = to_rtf("# Notes\n\nSome **bold** and *soft* {x}\n##### Five");
    assert_snapshot!(rtf, @r"{\rtf1\ansi\deff0 {\fonttbl {\f0 Times New Roman;}}\par \b \fs28 Notes\b0 \fs24 \par \par Some \b bold\b0  and \i soft\i0  \{x\}\par ##### Five\par }");
}

#[test]
fn test_kitchensink_paragraph_count() {
    let source = fixture("kitchensink.md");
    let rtf = to_rtf(&source);
    // One `\par` per line, plus one extra before each heading of level 1 to 4.
    let lines = source.split('\n').count();
    let headings = source
        .lines()
        .filter(|l| l.starts_with("# ") || l.starts_with("## ") || l.starts_with("#### "))
        .count();
    assert_eq!(rtf.matches(r"\par ").count(), lines + headings);
}

#[test]
fn test_kitchensink_keeps_unhandled_syntax() {
    let rtf = to_rtf(&fixture("kitchensink.md"));
    assert!(rtf.contains("- Write `code`"));
    assert!(rtf.contains("[docs](https://example.com)"));
    assert!(rtf.contains(r"##### Too deep\par "));
}
