// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Concatenates every page of every input, in list order, into one PDF.

use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use bindwerk_core::types::InputList;
use serde::Serialize;
use tracing::{info, instrument};

use super::progress::{ProgressObserver, percent_complete};
use super::{OcrPass, append_page};
use crate::pdf::{OutputDocument, PasswordSession, PdfReader};

/// Outcome of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub documents: usize,
    pub pages: usize,
    pub searchable: bool,
}

/// Merge `inputs` into a single PDF at `output`.
///
/// With an OCR pass every page is replaced by its searchable page. The output
/// file is written once, after all pages were collected, so a failed merge
/// leaves no partial file behind.
#[instrument(skip_all, fields(inputs = inputs.len(), output = %output.display(), ocr = ocr.is_some()))]
pub fn merge(
    inputs: &InputList,
    output: &Path,
    ocr: Option<OcrPass<'_>>,
    session: &mut PasswordSession,
    progress: &dyn ProgressObserver,
) -> Result<MergeReport> {
    if inputs.is_empty() {
        return Err(BindwerkError::InvalidInput(
            "no PDF files to merge".to_string(),
        ));
    }

    let mut document = OutputDocument::new();
    for path in inputs.paths() {
        let reader = PdfReader::open(path, session)?;
        let total = reader.page_count();
        info!(path = %path.display(), pages = total, "Merging document");
        progress.document_started(path, total);
        progress.progress(0);

        for index in 0..total {
            append_page(&mut document, &reader, index, ocr.as_ref())?;
            progress.progress(percent_complete(index + 1, total));
        }
    }

    let pages = document.page_count();
    document.save(output)?;
    progress.finished();

    info!(pages, "Merge complete");
    Ok(MergeReport {
        output: output.to_path_buf(),
        documents: inputs.len(),
        pages,
        searchable: ocr.is_some(),
    })
}
