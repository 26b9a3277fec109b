// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bindwerk-document — PDF assembly for the Bindwerk binder.
//
// Provides PDF operations (open with passwords, copy pages, write), the
// searchable page pipeline (rasterise, recognise, composite) and the merge,
// split and OCR workflows built on them.

pub mod compose;
pub mod pdf;
pub mod scan;
pub mod temp;
pub mod workflow;

// Re-export the primary types so callers can use `bindwerk_document::PdfReader` etc.
pub use compose::{SearchablePage, SearchablePageCompositor, compose_raster};
pub use pdf::{
    NoPasswords, OutputDocument, PasswordProvider, PasswordSession, PdfReader, ScriptedPasswords,
};
pub use scan::{
    PdftoppmRasterizer, RasterPage, RasterRequest, Rasterizer, TesseractRecognizer, TextRecognizer,
};
pub use temp::{CleanupWarning, TempArtifact};
pub use workflow::{
    MergeReport, NoProgress, OcrPass, OcrReport, ProgressObserver, SplitReport, merge,
    searchable_copy, split,
};

#[cfg(feature = "ocr")]
pub use scan::{OcrConfig, OcrsRecognizer};
