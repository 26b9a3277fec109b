// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Whole-document OCR: a searchable copy of one PDF.

use std::path::{Path, PathBuf};

use bindwerk_core::error::Result;
use serde::Serialize;
use tracing::{info, instrument};

use super::progress::{ProgressObserver, percent_complete};
use super::{OcrPass, append_page, base_name};
use crate::pdf::{OutputDocument, PasswordSession, PdfReader};

/// Outcome of a whole-document OCR run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrReport {
    pub output: PathBuf,
    pub pages: usize,
}

/// `{base}_ocr.pdf` in the directory of `input`.
pub fn default_ocr_output(input: &Path) -> PathBuf {
    let name = format!("{}_ocr.pdf", base_name(input));
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Write a copy of `input` where every page is a searchable page.
///
/// Writes to `output`, or next to the input as `{base}_ocr.pdf`.
#[instrument(skip_all, fields(input = %input.display(), language = ocr.language))]
pub fn searchable_copy(
    input: &Path,
    output: Option<&Path>,
    ocr: OcrPass<'_>,
    session: &mut PasswordSession,
    progress: &dyn ProgressObserver,
) -> Result<OcrReport> {
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_ocr_output(input));

    let reader = PdfReader::open(input, session)?;
    let total = reader.page_count();
    progress.document_started(input, total);
    progress.progress(0);

    let mut document = OutputDocument::new();
    for index in 0..total {
        append_page(&mut document, &reader, index, Some(&ocr))?;
        progress.progress(percent_complete(index + 1, total));
    }

    let pages = document.page_count();
    document.save(&target)?;
    progress.finished();

    info!(pages, output = %target.display(), "Searchable copy written");
    Ok(OcrReport {
        output: target,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_next_to_the_input() {
        assert_eq!(
            default_ocr_output(Path::new("/scans/minutes.pdf")),
            PathBuf::from("/scans/minutes_ocr.pdf")
        );
        assert_eq!(
            default_ocr_output(Path::new("minutes.pdf")),
            PathBuf::from("minutes_ocr.pdf")
        );
    }
}
