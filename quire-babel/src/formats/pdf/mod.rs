//! Paginated document export
//!
//! Sanitized markup is laid out on a fixed light-theme print page, rasterized
//! into one tall bitmap and then sliced across A4 pages:
//!
//! ```text
//! markup ─▶ print page ─▶ Rasterizer ─▶ RasterImage ─▶ tiled A4 pages ─▶ PDF
//! ```
//!
//! The pages are images; no text layer is produced. Headless Chrome is the
//! default rasterizer and is only available with the `native-export` feature.

#[cfg(feature = "native-export")]
mod chrome;
pub mod layout;
mod raster;
mod writer;

#[cfg(feature = "native-export")]
pub use chrome::{resolve_chrome_binary, ChromeRasterizer, CHROME_BIN_ENV};
pub use layout::{tile_offsets, Placement, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SLICE_HEIGHT_MM};
pub use raster::{get_print_css, print_page_html, PrintLayout, RasterImage, Rasterizer};
pub use writer::write_pages;

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::markup::SanitizedMarkup;

/// Render markup into a paginated PDF.
pub fn to_paginated(
    markup: &SanitizedMarkup,
    rasterizer: &dyn Rasterizer,
) -> Result<Vec<u8>, FormatError> {
    let raster = rasterizer.rasterize(markup)?;
    tracing::debug!(
        width = raster.width,
        height = raster.height,
        "rasterized print page"
    );
    write_pages(&raster)
}

/// Format implementation for paginated PDF documents
pub struct PdfFormat {
    rasterizer: Box<dyn Rasterizer>,
}

impl PdfFormat {
    pub fn with_rasterizer(rasterizer: impl Rasterizer + 'static) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
        }
    }
}

#[cfg(feature = "native-export")]
impl PdfFormat {
    pub fn new() -> Self {
        Self::with_rasterizer(ChromeRasterizer::new())
    }
}

#[cfg(feature = "native-export")]
impl Default for PdfFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for PdfFormat {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Portable Document Format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn content_type(&self) -> &str {
        "application/pdf"
    }

    fn requires_markup(&self) -> bool {
        true
    }

    fn serialize_markup(&self, markup: &SanitizedMarkup) -> Result<SerializedDocument, FormatError> {
        to_paginated(markup, self.rasterizer.as_ref()).map(SerializedDocument::Binary)
    }
}
