//! DOCX export: open the produced package and inspect its parts

use crate::common::fixture;
use quire_babel::formats::docx::to_word_doc;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn paragraphs(xml: &str) -> Vec<(Option<String>, String)> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name((W_NS, "p")))
        .map(|p| {
            let style = p
                .descendants()
                .find(|n| n.has_tag_name((W_NS, "pStyle")))
                .and_then(|n| n.attribute((W_NS, "val")))
                .map(str::to_string);
            let text = p
                .descendants()
                .filter(|n| n.has_tag_name((W_NS, "t")))
                .filter_map(|n| n.text())
                .collect::<String>();
            (style, text)
        })
        .collect()
}

#[test]
fn test_package_parts() {
    let docx = to_word_doc("hello").unwrap();
    let archive = ZipArchive::new(Cursor::new(docx.as_slice())).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
        ]
    );
}

#[test]
fn test_one_paragraph_per_line() {
    let source = fixture("kitchensink.md");
    let docx = to_word_doc(&source).unwrap();
    let paras = paragraphs(&read_part(&docx, "word/document.xml"));
    assert_eq!(paras.len(), source.split('\n').count());
}

#[test]
fn test_heading_styles_and_text() {
    let source = fixture("kitchensink.md");
    let docx = to_word_doc(&source).unwrap();
    let paras = paragraphs(&read_part(&docx, "word/document.xml"));

    assert_eq!(
        paras[0],
        (Some("Heading1".to_string()), "Quarterly Notes".to_string())
    );
    assert_eq!(paras[1], (None, String::new()));
    assert_eq!(
        paras[2],
        (None, "Intro with bold and *italic* text.".to_string())
    );
    assert_eq!(paras[4], (Some("Heading2".to_string()), "Tasks".to_string()));
    assert_eq!(
        paras[11],
        (Some("Heading4".to_string()), "Deep heading".to_string())
    );
    assert_eq!(paras[12], (None, "##### Too deep".to_string()));
}

#[test]
fn test_styles_define_headings() {
    let docx = to_word_doc("# x").unwrap();
    let styles = read_part(&docx, "word/styles.xml");
    let doc = roxmltree::Document::parse(&styles).unwrap();
    let ids: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W_NS, "style")))
        .filter_map(|n| n.attribute((W_NS, "styleId")))
        .collect();
    for id in ["Normal", "Heading1", "Heading2", "Heading3", "Heading4"] {
        assert!(ids.contains(&id), "missing style {id}");
    }
}

#[test]
fn test_markup_in_text_is_escaped() {
    let docx = to_word_doc("a <b> & \"c\"").unwrap();
    let xml = read_part(&docx, "word/document.xml");
    let paras = paragraphs(&xml);
    assert_eq!(paras[0].1, "a <b> & \"c\"");
    assert!(!xml.contains("<b>"));
}

#[test]
fn test_control_characters_keep_document_well_formed() {
    let docx = to_word_doc("before\u{1}after\u{b}x\n# Title\u{1f}").unwrap();
    let xml = read_part(&docx, "word/document.xml");
    let paras = paragraphs(&xml);
    assert_eq!(paras.len(), 2);
    assert_eq!(paras[0].1, "beforeafterx");
    assert_eq!(paras[1], (Some("Heading1".to_string()), "Title".to_string()));
}
