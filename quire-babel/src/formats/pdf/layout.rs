//! Page geometry for tiling one tall raster across A4 pages
//!
//! The raster is scaled to the page width and drawn once per page, shifted
//! up by one slice height each time. Pages are added while content remains
//! below the previous slice; content ending exactly on a slice boundary does
//! not get a trailing blank page.

/// A4 width in millimetres; also the width the raster is scaled to.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Vertical advance between pages.
pub const SLICE_HEIGHT_MM: f64 = 295.0;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Size of the raster once placed on the page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Placement {
    /// Scale a `width_px` × `height_px` raster to the page width.
    pub fn for_raster(width_px: u32, height_px: u32) -> Self {
        let height_mm = f64::from(height_px) * PAGE_WIDTH_MM / f64::from(width_px);
        Self {
            width_mm: PAGE_WIDTH_MM,
            height_mm,
        }
    }

    /// Vertical offsets (mm from the page top) at which the raster is drawn,
    /// one entry per page.
    pub fn tile_offsets(&self) -> Vec<f64> {
        tile_offsets(self.height_mm)
    }
}

/// Offsets for a raster `height_mm` tall: `0`, then `remaining - height` while
/// `remaining > 0`, where `remaining` starts at `height - slice` and shrinks by
/// one slice per page.
pub fn tile_offsets(height_mm: f64) -> Vec<f64> {
    let mut offsets = vec![0.0];
    let mut remaining = height_mm - SLICE_HEIGHT_MM;
    while remaining > 0.0 {
        offsets.push(remaining - height_mm);
        remaining -= SLICE_HEIGHT_MM;
    }
    offsets
}
