//! OOXML packaging: WordprocessingML body + zip container

use super::document::{Paragraph, Run, WordDocument};
use crate::error::FormatError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A4 in twentieths of a point, one inch margins.
const PAGE_WIDTH: &str = "11906";
const PAGE_HEIGHT: &str = "16838";
const PAGE_MARGIN: &str = "1440";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>Markdown Document</dc:title>
  <dc:creator>quire</dc:creator>
</cp:coreProperties>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:sz w:val="24"/></w:rPr></w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="200" w:after="100"/><w:outlineLvl w:val="1"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="28"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading3">
    <w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="160" w:after="80"/><w:outlineLvl w:val="2"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="26"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading4">
    <w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="120" w:after="60"/><w:outlineLvl w:val="3"/></w:pPr>
    <w:rPr><w:b/><w:i/><w:sz w:val="24"/></w:rPr>
  </w:style>
</w:styles>"#;

fn xml_err(e: impl std::fmt::Display) -> FormatError {
    FormatError::PackagingError(format!("XML write failed: {e}"))
}

fn zip_err(e: impl std::fmt::Display) -> FormatError {
    FormatError::PackagingError(format!("zip write failed: {e}"))
}

/// Render `word/document.xml` for a document tree.
pub fn document_xml(doc: &WordDocument) -> Result<String, FormatError> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORDML_NS));
    writer.write_event(Event::Start(root)).map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("w:body")))
        .map_err(xml_err)?;

    for paragraph in doc.paragraphs() {
        write_paragraph(&mut writer, paragraph)?;
    }

    let mut page_size = BytesStart::new("w:pgSz");
    page_size.push_attribute(("w:w", PAGE_WIDTH));
    page_size.push_attribute(("w:h", PAGE_HEIGHT));
    let mut margins = BytesStart::new("w:pgMar");
    for side in ["w:top", "w:right", "w:bottom", "w:left"] {
        margins.push_attribute((side, PAGE_MARGIN));
    }
    writer
        .write_event(Event::Start(BytesStart::new("w:sectPr")))
        .map_err(xml_err)?;
    writer.write_event(Event::Empty(page_size)).map_err(xml_err)?;
    writer.write_event(Event::Empty(margins)).map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:sectPr")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("w:body")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:document")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn write_paragraph(writer: &mut Writer<Vec<u8>>, paragraph: &Paragraph) -> Result<(), FormatError> {
    writer
        .write_event(Event::Start(BytesStart::new("w:p")))
        .map_err(xml_err)?;

    if let Some(style_id) = paragraph.style.style_id() {
        let mut style = BytesStart::new("w:pStyle");
        style.push_attribute(("w:val", style_id.as_str()));
        writer
            .write_event(Event::Start(BytesStart::new("w:pPr")))
            .map_err(xml_err)?;
        writer.write_event(Event::Empty(style)).map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("w:pPr")))
            .map_err(xml_err)?;
    }

    for run in &paragraph.runs {
        write_run(writer, run)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("w:p")))
        .map_err(xml_err)
}

fn write_run(writer: &mut Writer<Vec<u8>>, run: &Run) -> Result<(), FormatError> {
    writer
        .write_event(Event::Start(BytesStart::new("w:r")))
        .map_err(xml_err)?;

    if run.bold {
        writer
            .write_event(Event::Start(BytesStart::new("w:rPr")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Empty(BytesStart::new("w:b")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("w:rPr")))
            .map_err(xml_err)?;
    }

    let content = xml_chars(&run.text);
    let mut text = BytesStart::new("w:t");
    // Word trims run text unless told otherwise.
    if content.starts_with(char::is_whitespace) || content.ends_with(char::is_whitespace) {
        text.push_attribute(("xml:space", "preserve"));
    }
    writer.write_event(Event::Start(text)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&content)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:t")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("w:r")))
        .map_err(xml_err)
}

/// Drop characters XML 1.0 does not allow in text, such as C0 controls other
/// than tab, newline and carriage return.
fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Serialize a document tree into a `.docx` zip container.
pub fn package(doc: &WordDocument) -> Result<Vec<u8>, FormatError> {
    let body = document_xml(doc)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("docProps/core.xml", CORE_XML),
        ("word/document.xml", &body),
        ("word/styles.xml", STYLES_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
    ];

    for (name, contents) in parts {
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(contents.as_bytes()).map_err(zip_err)?;
    }

    let cursor = zip.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}
