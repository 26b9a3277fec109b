// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writes selected pages of each input as one-page PDFs.

use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use bindwerk_core::types::PageSelection;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::progress::{ProgressObserver, percent_complete};
use super::{OcrPass, append_page, base_name};
use crate::pdf::{OutputDocument, PasswordSession, PdfReader};

/// Outcome of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub output_dir: PathBuf,
    pub documents: usize,
    /// Every file written, in the order they were written.
    pub outputs: Vec<PathBuf>,
}

/// `{base}_{page}.pdf` for the zero-based `page_index` of `source`.
pub fn split_output_name(source: &Path, page_index: usize) -> String {
    format!("{}_{}.pdf", base_name(source), page_index + 1)
}

/// Split every input into one file per selected page inside `output_dir`.
///
/// The selection is resolved against each document's own page count, so
/// `"2-4"` picks pages 2-4 of every input. Pages outside a document are
/// skipped. Existing files with the same name are overwritten.
#[instrument(skip_all, fields(inputs = inputs.len(), output_dir = %output_dir.display(), ocr = ocr.is_some()))]
pub fn split(
    inputs: &[PathBuf],
    output_dir: &Path,
    selection: &PageSelection,
    ocr: Option<OcrPass<'_>>,
    session: &mut PasswordSession,
    progress: &dyn ProgressObserver,
) -> Result<SplitReport> {
    if inputs.is_empty() {
        return Err(BindwerkError::InvalidInput(
            "no PDF files to split".to_string(),
        ));
    }
    std::fs::create_dir_all(output_dir)?;

    let mut outputs = Vec::new();
    for path in inputs {
        let reader = PdfReader::open(path, session)?;
        let pages = selection.resolve(reader.page_count());
        if pages.is_empty() {
            warn!(path = %path.display(), "Page selection matches no pages");
        }
        info!(path = %path.display(), pages = pages.len(), "Splitting document");
        progress.document_started(path, pages.len());
        progress.progress(0);

        for (done, &index) in pages.iter().enumerate() {
            let mut document = OutputDocument::new();
            append_page(&mut document, &reader, index, ocr.as_ref())?;

            let target = output_dir.join(split_output_name(path, index));
            document.save(&target)?;
            debug!(page = index + 1, target = %target.display(), "Page written");
            outputs.push(target);

            progress.progress(percent_complete(done + 1, pages.len()));
        }
    }
    progress.finished();

    info!(files = outputs.len(), "Split complete");
    Ok(SplitReport {
        output_dir: output_dir.to_path_buf(),
        documents: inputs.len(),
        outputs,
    })
}
