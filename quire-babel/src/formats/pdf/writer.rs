//! PDF assembly
//!
//! One image XObject holds the whole raster; every page references it and
//! positions it with its own content stream so the visible window shows the
//! next slice.

use super::layout::{mm_to_pt, Placement, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::raster::RasterImage;
use crate::error::FormatError;
use crate::formats::html::DOCUMENT_TITLE;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use std::io::Write;

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Lay `raster` out over as many A4 pages as the tiling rule asks for.
pub fn write_pages(raster: &RasterImage) -> Result<Vec<u8>, FormatError> {
    let placement = Placement::for_raster(raster.width, raster.height);
    let offsets = placement.tile_offsets();
    let image_data = compress(&raster.rgb)?;

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let image_id = alloc.bump();
    let info_id = alloc.bump();
    let page_ids: Vec<(Ref, Ref)> = offsets
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);

    let page_w = mm_to_pt(PAGE_WIDTH_MM) as f32;
    let page_h = mm_to_pt(PAGE_HEIGHT_MM) as f32;
    let image_w = mm_to_pt(placement.width_mm) as f32;
    let image_h = mm_to_pt(placement.height_mm) as f32;

    for (&(page_id, content_id), &offset) in page_ids.iter().zip(offsets.iter()) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        // PDF space grows upwards: the image's bottom edge sits below the
        // page top by offset + image height.
        let bottom = page_h - mm_to_pt(offset + placement.height_mm) as f32;
        let mut content = Content::new();
        content.save_state();
        content.transform([image_w, 0.0, 0.0, image_h, 0.0, bottom]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        pdf.stream(content_id, &content.finish());
    }

    let mut image = pdf.image_xobject(image_id, &image_data);
    image.filter(Filter::FlateDecode);
    image.width(raster.width as i32);
    image.height(raster.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    pdf.document_info(info_id)
        .title(TextStr(DOCUMENT_TITLE))
        .producer(TextStr("quire"));

    let bytes = pdf.finish();
    tracing::debug!(pages = page_ids.len(), bytes = bytes.len(), "assembled pdf");
    Ok(bytes)
}

fn compress(data: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| FormatError::PackagingError(format!("Failed to compress raster: {e}")))
}
