// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Searchable page compositor — rasterise a page, recognise its text, and
// rebuild it as an image with an invisible text layer.

pub mod layout;
mod page;

use std::path::Path;

use bindwerk_core::error::{BindwerkError, Result};
use bindwerk_core::types::DEFAULT_RASTER_DPI;
use tracing::{debug, info, instrument};

use crate::scan::{RasterPage, RasterRequest, Rasterizer, TextRecognizer};

pub use layout::{PlacedLine, layout_text_lines, line_capacity};

/// A one-page PDF whose visible content is a page image and whose text layer
/// is invisible.
#[derive(Debug, Clone)]
pub struct SearchablePage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    lines: Vec<PlacedLine>,
}

impl SearchablePage {
    /// The serialised one-page PDF.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Page size in points (equal to the raster size in pixels).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Text lines placed on the page, blank lines included.
    pub fn lines(&self) -> &[PlacedLine] {
        &self.lines
    }
}

/// Builds searchable pages from a rasteriser and a text recogniser.
///
/// Each call handles one page and runs rasterise -> recognise -> composite
/// without retries. Any failure aborts that page and is returned to the
/// caller.
pub struct SearchablePageCompositor {
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn TextRecognizer>,
    dpi: u32,
}

impl SearchablePageCompositor {
    pub fn new(
        rasterizer: impl Rasterizer + 'static,
        recognizer: impl TextRecognizer + 'static,
    ) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            recognizer: Box::new(recognizer),
            dpi: DEFAULT_RASTER_DPI,
        }
    }

    /// Rasterise at `dpi` instead of the default 300.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Build the searchable page for zero-based `page_index` of an
    /// unencrypted document.
    pub fn compose(
        &self,
        source: &Path,
        page_index: usize,
        language: &str,
    ) -> Result<SearchablePage> {
        self.compose_with_password(source, None, page_index, language)
    }

    /// Build the searchable page for zero-based `page_index`, handing
    /// `password` to the rasteriser for encrypted documents.
    #[instrument(skip(self, password), fields(source = %source.display()))]
    pub fn compose_with_password(
        &self,
        source: &Path,
        password: Option<&str>,
        page_index: usize,
        language: &str,
    ) -> Result<SearchablePage> {
        let request = RasterRequest::single_page(source, page_index, self.dpi)?.with_password(password);
        let mut rasters = self.rasterizer.rasterize(&request)?;
        if rasters.len() != 1 {
            return Err(BindwerkError::RasterError(format!(
                "expected one image for {} page {}, got {}",
                source.display(),
                page_index + 1,
                rasters.len()
            )));
        }
        let raster = rasters.remove(0);
        debug!(width = raster.width(), height = raster.height(), "Rasterised");

        let text = self.recognizer.recognize(raster.image(), language)?;
        debug!(chars = text.len(), "Recognised");

        let page = compose_raster(&raster, &text)?;
        info!(
            page = page_index + 1,
            lines = page.lines().len(),
            "Searchable page composited"
        );
        Ok(page)
    }
}

/// Composite an already rasterised page with its recognised text.
pub fn compose_raster(raster: &RasterPage, text: &str) -> Result<SearchablePage> {
    let lines = layout_text_lines(text, raster.height() as f32);
    let bytes = page::render_searchable_page(raster, &lines)?;
    Ok(SearchablePage {
        bytes,
        width: raster.width(),
        height: raster.height(),
        lines,
    })
}
