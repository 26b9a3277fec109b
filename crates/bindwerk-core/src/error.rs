// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bindwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bindwerk operations.
#[derive(Debug, Error)]
pub enum BindwerkError {
    // -- Input errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("reading {} was aborted", file.display())]
    Aborted { file: PathBuf },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Rasterisation / recognition errors --
    #[error("page rasterisation failed: {0}")]
    RasterError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BindwerkError>;
