//! Format implementations
//!
//! Line-oriented encoders (text, RTF, DOCX) read the Markdown source
//! directly. The HTML file and PDF encoders consume sanitized markup.

pub mod docx;
pub mod html;
pub mod pdf;
pub mod rtf;
pub mod text;

pub use docx::DocxFormat;
pub use html::{get_default_css, HtmlFormat};
pub use pdf::PdfFormat;
pub use rtf::RtfFormat;
pub use text::TextFormat;
