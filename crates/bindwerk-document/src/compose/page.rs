// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Searchable page rendering with `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: a page is a `PdfPage` holding a
// `Vec<Op>` operation list, serialised via `PdfDocument::save()`.

use bindwerk_core::error::{BindwerkError, Result};
use lopdf::{Document, Object};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, TextRenderingMode, XObjectTransform,
};
use tracing::{debug, instrument};

use super::layout::{FONT_SIZE, PlacedLine};
use crate::scan::RasterPage;

/// Title recorded in the document information dictionary.
const PAGE_TITLE: &str = "Bindwerk searchable page";

/// Points to millimetres; printpdf sizes pages in `Mm`.
fn pt_to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Build a one-page PDF: `raster` drawn full-bleed, `lines` as invisible text.
///
/// The page is `raster.width() x raster.height()` points, one point per
/// pixel, so the image needs no scaling.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height(), lines = lines.len()))]
pub(crate) fn render_searchable_page(raster: &RasterPage, lines: &[PlacedLine]) -> Result<Vec<u8>> {
    let width_pt = raster.width() as f32;
    let height_pt = raster.height() as f32;

    let rgb_image = raster.image().to_rgb8();
    let raw = RawImage {
        pixels: RawImageData::U8(rgb_image.into_raw()),
        width: raster.width() as usize,
        height: raster.height() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let mut doc = PdfDocument::new(PAGE_TITLE);
    let xobject_id = doc.add_image(&raw);

    // At 72 DPI one pixel is one point, so the image covers the page exactly.
    let mut ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(72.0),
            rotate: None,
        },
    }];

    for line in lines.iter().filter(|line| !line.text.trim().is_empty()) {
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextRenderingMode {
            mode: TextRenderingMode::Invisible,
        });
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(line.x),
                y: Pt(line.y),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(FONT_SIZE),
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.text.clone())],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }

    let page = PdfPage::new(pt_to_mm(width_pt), pt_to_mm(height_pt), ops);
    doc.with_pages(vec![page]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let saved = doc.save(&PdfSaveOptions::default(), &mut warnings);
    let output = set_exact_page_boxes(&saved, raster.width(), raster.height())?;

    debug!(
        output_bytes = output.len(),
        warnings = warnings.len(),
        "Searchable page rendered"
    );
    Ok(output)
}

/// printpdf sizes pages in millimetres, so its boxes carry float rounding.
/// Rewrite them as `[0 0 width height]` in whole points.
fn set_exact_page_boxes(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut document = Document::load_mem(bytes).map_err(|err| {
        BindwerkError::PdfError(format!("failed to reload rendered page: {}", err))
    })?;
    let exact = || {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(i64::from(width)),
            Object::Integer(i64::from(height)),
        ])
    };

    let page_ids: Vec<_> = document.get_pages().into_values().collect();
    for page_id in page_ids {
        let page = document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| {
                BindwerkError::PdfError(format!("rendered page is unreadable: {}", err))
            })?;
        page.set("MediaBox", exact());
        for key in [&b"CropBox"[..], &b"TrimBox"[..]] {
            if page.has(key) {
                page.set(key.to_vec(), exact());
            }
        }
    }

    let mut output = Vec::new();
    document.save_to(&mut output).map_err(|err| {
        BindwerkError::PdfError(format!("failed to serialise rendered page: {}", err))
    })?;
    Ok(output)
}
