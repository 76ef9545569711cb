//! End-to-end exports through the dispatcher

use crate::common::fixture;
use quire_babel::{
    Delivery, EncodedOutput, ExportFormat, ExportOutcome, Exporter, FormatRegistry,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// Writes each delivered file into a directory.
struct DirDelivery {
    dir: PathBuf,
    written: Arc<Mutex<Vec<PathBuf>>>,
}

impl Delivery for DirDelivery {
    fn deliver(&self, output: &EncodedOutput) -> io::Result<()> {
        let path = self.dir.join(&output.filename);
        fs::write(&path, &output.bytes)?;
        self.written.lock().unwrap().push(path);
        Ok(())
    }
}

fn exporter(dir: PathBuf) -> (Exporter, Arc<Mutex<Vec<PathBuf>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let delivery = DirDelivery {
        dir,
        written: written.clone(),
    };
    (
        Exporter::new(FormatRegistry::with_defaults(), delivery),
        written,
    )
}

#[test]
fn test_each_line_format_writes_one_file() {
    let dir = tempdir().unwrap();
    let (exporter, written) = exporter(dir.path().to_path_buf());
    let source = fixture("kitchensink.md");

    for format in [
        ExportFormat::Txt,
        ExportFormat::Rtf,
        ExportFormat::Docx,
        ExportFormat::Html,
    ] {
        assert_eq!(
            exporter.export(format, &source, "kitchensink.md"),
            ExportOutcome::Success(format)
        );
    }

    let mut names: Vec<_> = written
        .lock()
        .unwrap()
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "kitchensink.docx",
            "kitchensink.html",
            "kitchensink.rtf",
            "kitchensink.txt"
        ]
    );

    let rtf = fs::read_to_string(dir.path().join("kitchensink.rtf")).unwrap();
    assert!(rtf.starts_with(r"{\rtf1"));
    let docx = fs::read(dir.path().join("kitchensink.docx")).unwrap();
    assert!(docx.starts_with(b"PK"));
}

#[test]
fn test_delivery_failure_leaves_no_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let (exporter, written) = exporter(missing.clone());

    let outcome = exporter.export(ExportFormat::Txt, "text", "notes");
    assert_eq!(
        outcome,
        ExportOutcome::Failure {
            format: ExportFormat::Txt,
            message: "Failed to export as TXT. Please try again.".to_string(),
        }
    );
    assert!(written.lock().unwrap().is_empty());
    assert!(!missing.exists());
}

#[test]
fn test_convert_returns_buffer() {
    let dir = tempdir().unwrap();
    let (exporter, written) = exporter(dir.path().to_path_buf());

    let output = exporter
        .convert(ExportFormat::Html, "# Hi", "page.markdown")
        .unwrap();
    assert_eq!(output.filename, "page.html");
    assert_eq!(output.content_type, "text/html");
    assert!(String::from_utf8(output.bytes).unwrap().contains("<h1>Hi</h1>"));
    assert!(written.lock().unwrap().is_empty());
}
