// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterisation — rendering PDF pages to bitmaps.
//
// The default rasteriser drives poppler's `pdftoppm`, one invocation per page,
// with output written to a temporary PNG that is removed after decoding.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use bindwerk_core::error::{BindwerkError, Result};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use crate::temp::TempArtifact;

/// What to rasterise: an inclusive, 1-based page range of one document.
#[derive(Debug, Clone, Copy)]
pub struct RasterRequest<'a> {
    pub path: &'a Path,
    /// First page, 1-based.
    pub first_page: u32,
    /// Last page, 1-based and inclusive.
    pub last_page: u32,
    pub dpi: u32,
    /// User password of an encrypted document.
    pub password: Option<&'a str>,
}

impl<'a> RasterRequest<'a> {
    /// A request for the single page at zero-based `page_index`.
    pub fn single_page(path: &'a Path, page_index: usize, dpi: u32) -> Result<Self> {
        let page_number = u32::try_from(page_index + 1).map_err(|_| {
            BindwerkError::InvalidInput(format!("page index {} is too large", page_index))
        })?;
        Ok(Self {
            path,
            first_page: page_number,
            last_page: page_number,
            dpi,
            password: None,
        })
    }

    pub fn with_password(mut self, password: Option<&'a str>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    /// Number of pages the request covers.
    pub fn page_count(&self) -> usize {
        if self.last_page < self.first_page {
            0
        } else {
            (self.last_page - self.first_page) as usize + 1
        }
    }
}

/// One rendered page. Its pixel dimensions become the page size of the
/// searchable page built from it.
#[derive(Debug, Clone)]
pub struct RasterPage {
    image: DynamicImage,
}

impl RasterPage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Renders PDF pages to bitmaps.
pub trait Rasterizer: Send + Sync {
    /// Render every page of the request, in page order.
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<RasterPage>>;
}

/// Rasteriser backed by the `pdftoppm` program from poppler.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: String,
}

impl PdftoppmRasterizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Arguments rendering page `page` of the request to `<output_root>.png`.
    fn command_args(request: &RasterRequest<'_>, page: u32, output_root: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-r".into(),
            request.dpi.to_string().into(),
            "-f".into(),
            page.to_string().into(),
            "-l".into(),
            page.to_string().into(),
            "-singlefile".into(),
            "-png".into(),
        ];
        if let Some(password) = request.password {
            args.push("-upw".into());
            args.push(password.into());
        }
        args.push(request.path.into());
        args.push(output_root.into());
        args
    }

    fn rasterize_page(&self, request: &RasterRequest<'_>, page: u32) -> Result<RasterPage> {
        let artifact = TempArtifact::create("bindwerk-raster-", ".png")?;
        // pdftoppm appends the extension itself.
        let output_root = artifact.path().with_extension("");

        let output = Command::new(&self.command)
            .args(Self::command_args(request, page, &output_root))
            .output()
            .map_err(|err| {
                BindwerkError::RasterError(format!(
                    "failed to execute {} for {}: {}",
                    self.command,
                    request.path.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            artifact.cleanup();
            return Err(BindwerkError::RasterError(format!(
                "{} returned {} for {} page {}: {}",
                self.command,
                output.status,
                request.path.display(),
                page,
                stderr.trim()
            )));
        }

        let decoded = image::open(artifact.path()).map_err(|err| {
            BindwerkError::RasterError(format!(
                "{} did not produce a readable image for {} page {}: {}",
                self.command,
                request.path.display(),
                page,
                err
            ))
        });
        artifact.cleanup();
        let image = decoded?;

        debug!(page, width = image.width(), height = image.height(), "Page rasterised");
        Ok(RasterPage::new(image))
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Rasterizer for PdftoppmRasterizer {
    #[instrument(skip_all, fields(
        path = %request.path.display(),
        first = request.first_page,
        last = request.last_page,
        dpi = request.dpi,
    ))]
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<RasterPage>> {
        if request.first_page == 0 {
            return Err(BindwerkError::InvalidInput(
                "page numbers passed to the rasteriser are 1-based".to_string(),
            ));
        }
        info!(pages = request.page_count(), "Rasterising pages");

        (request.first_page..=request.last_page)
            .map(|page| self.rasterize_page(request, page))
            .collect()
    }
}
