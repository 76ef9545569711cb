//! Markdown export core
//!
//!     This crate turns Markdown into exportable documents: standalone HTML,
//!     plain text, RTF, DOCX and paginated PDF. Everything happens locally; the
//!     only external process is the headless browser used to rasterize PDF
//!     pages.
//!
//!     This is a pure lib, that is, it powers quire-cli but is shell agnostic:
//!     no code here prints or reads the environment, with the single exception
//!     of locating a Chrome binary for the PDF rasterizer.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── export.rs               # dispatcher, filenames, status board
//!     ├── intake.rs               # which input files are accepted
//!     ├── lines.rs                # line classifier + inline runs (RTF, DOCX)
//!     ├── markup                  # Markdown → sanitized HTML
//!     ├── formats
//!     │   ├── text                # raw Markdown in
//!     │   ├── rtf                 # raw Markdown in
//!     │   ├── docx                # raw Markdown in, zip out
//!     │   ├── html                # sanitized markup in
//!     │   └── pdf                 # sanitized markup in, raster pages out
//!     └── lib.rs
//!
//! Two kinds of encoders
//!
//!     Line-oriented encoders (text, RTF, DOCX) read the raw source one line at
//!     a time and only understand headings and emphasis. HTML-consuming
//!     encoders (HTML file, PDF) get the full GFM rendering through
//!     [`markup::parse`], which also strips anything executable. The
//!     [`format::Format`] trait carries both entry points and
//!     [`FormatRegistry::render`] picks the right one.
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # aggregates the modules below
//!     ├── common                  # fixture loading
//!     ├── formats/<format>.rs     # one file per encoder
//!     ├── dispatch                # Exporter end to end
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.

pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod intake;
pub mod lines;
pub mod markup;
pub mod registry;

pub use error::FormatError;
pub use export::{
    export_filename, Delivery, EncodedOutput, ExportError, ExportFormat, ExportOutcome, Exporter,
    StatusBoard,
};
pub use format::{Format, SerializedDocument};
pub use intake::{file_extension, is_markdown_file, read_markdown_file, IntakeError};
pub use markup::{configure, parse, ParserConfig, SanitizedMarkup};
pub use registry::FormatRegistry;
