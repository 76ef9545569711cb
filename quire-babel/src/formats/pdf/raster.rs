//! Print page and rasterizer seam
//!
//! The paginated export needs the rendered markup as one tall RGB bitmap.
//! Producing that bitmap is delegated to a [`Rasterizer`] so the page
//! assembly can be exercised without a browser.

use crate::error::FormatError;
use crate::markup::SanitizedMarkup;
use serde::{Deserialize, Serialize};

const PRINT_CSS: &str = include_str!("../../../css/print.css");

/// The stylesheet used for the print page.
pub fn get_print_css() -> &'static str {
    PRINT_CSS
}

/// Layout of the print page before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintLayout {
    /// Content width in CSS pixels.
    pub content_width: u32,
    /// Padding on every side, in CSS pixels.
    pub padding: u32,
    /// Device pixels per CSS pixel.
    pub scale: f32,
}

impl Default for PrintLayout {
    fn default() -> Self {
        Self {
            content_width: 800,
            padding: 40,
            scale: 2.0,
        }
    }
}

impl PrintLayout {
    /// Viewport width in CSS pixels: content plus padding on both sides.
    pub fn viewport_width(&self) -> u32 {
        self.content_width + 2 * self.padding
    }
}

/// Wrap markup in the fixed light-theme print page.
pub fn print_page_html(markup: &SanitizedMarkup, layout: &PrintLayout) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Markdown Document</title>
<style>
{PRINT_CSS}
.quire-print {{ width: {width}px; padding: {padding}px; }}
</style>
</head>
<body>
<div class="quire-print">
{markup}
</div>
</body>
</html>
"#,
        width = layout.content_width,
        padding = layout.padding,
    )
}

/// An 8-bit RGB bitmap, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, FormatError> {
        if width == 0 || height == 0 {
            return Err(FormatError::RenderError(format!(
                "Rasterized page is empty ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(FormatError::RenderError(format!(
                "Raster buffer holds {} bytes, expected {expected}",
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Decode a PNG screenshot into RGB, dropping any alpha channel.
    pub fn from_png(bytes: &[u8]) -> Result<Self, FormatError> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| FormatError::RenderError(format!("Failed to decode screenshot: {e}")))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        Self::new(width, height, decoded.into_raw())
    }
}

/// Turns a print page into a bitmap.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, markup: &SanitizedMarkup) -> Result<RasterImage, FormatError>;
}
