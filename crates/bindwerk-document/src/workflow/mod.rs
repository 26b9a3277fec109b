// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch workflows — merge, split and whole-document OCR.
//
// Documents are processed one after another and pages strictly in order. The
// first failure aborts the batch; nothing is retried.

pub mod merge;
pub mod progress;
pub mod searchable;
pub mod split;

use std::path::Path;

use bindwerk_core::error::Result;

use crate::compose::SearchablePageCompositor;
use crate::pdf::{OutputDocument, PdfReader};

pub use merge::{MergeReport, merge};
pub use progress::{NoProgress, ProgressObserver, percent_complete};
pub use searchable::{OcrReport, default_ocr_output, searchable_copy};
pub use split::{SplitReport, split, split_output_name};

/// Replace pages with searchable pages while copying.
#[derive(Clone, Copy)]
pub struct OcrPass<'a> {
    pub compositor: &'a SearchablePageCompositor,
    /// Recognition language tag, e.g. `jpn+eng`.
    pub language: &'a str,
}

impl<'a> OcrPass<'a> {
    pub fn new(compositor: &'a SearchablePageCompositor, language: &'a str) -> Self {
        Self {
            compositor,
            language,
        }
    }
}

/// Copy page `index` of `reader` into `output`, through the OCR pass when
/// one is given.
fn append_page(
    output: &mut OutputDocument,
    reader: &PdfReader,
    index: usize,
    ocr: Option<&OcrPass<'_>>,
) -> Result<()> {
    match ocr {
        None => output.append_page(reader, index),
        Some(pass) => {
            let page = pass.compositor.compose_with_password(
                reader.source_path(),
                reader.password(),
                index,
                pass.language,
            )?;
            output.append_searchable(&page)
        }
    }
}

/// File stem used to name outputs derived from `path`.
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_drops_directory_and_extension() {
        assert_eq!(base_name(Path::new("/scans/report.final.pdf")), "report.final");
        assert_eq!(base_name(Path::new("notes.PDF")), "notes");
        assert_eq!(base_name(Path::new("/")), "document");
    }
}
