// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bindwerk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BindwerkError, Result};
use crate::range::PageRangeResolver;

/// Language tag used when none is configured: combined Japanese + English.
pub const DEFAULT_OCR_LANGUAGE: &str = "jpn+eng";

/// Pages are rasterised at this resolution before recognition.
pub const DEFAULT_RASTER_DPI: u32 = 300;

/// Settings for the per-page OCR pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrOptions {
    /// Language tag, e.g. `jpn+eng` for "try Japanese and English".
    pub language: String,
    pub dpi: u32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            dpi: DEFAULT_RASTER_DPI,
        }
    }
}

/// Which pages of a document an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page, in document order.
    All,
    /// A page range expression such as `1,3,5-7`.
    Expression(String),
}

impl PageSelection {
    /// Build a selection from user input. Blank input selects every page.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::All
        } else {
            Self::Expression(trimmed.to_string())
        }
    }

    /// Zero-based page indices selected out of `total_pages`.
    pub fn resolve(&self, total_pages: usize) -> Vec<usize> {
        match self {
            Self::All => (0..total_pages).collect(),
            Self::Expression(expression) => PageRangeResolver::resolve(expression, total_pages),
        }
    }
}

/// Ordered list of source documents to merge.
///
/// Order is significant: pages are emitted file by file in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputList {
    paths: Vec<PathBuf>,
}

impl InputList {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Collect every `*.pdf` file (extension matched case-insensitively) in
    /// `dir`, sorted by file name. Subdirectories are not searched.
    pub fn from_folder(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut names = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_ascii_lowercase().ends_with(".pdf") {
                names.push(name);
            }
        }

        names.sort();
        info!(dir = %dir.display(), files = names.len(), "Collected PDFs from folder");

        Ok(Self {
            paths: names.into_iter().map(|name| dir.join(name)).collect(),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Move the entry at `from` so it ends up at position `to`, shifting the
    /// entries in between. This is what dragging a row in a list does.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.paths.len();
        if from >= len || to >= len {
            return Err(BindwerkError::InvalidInput(format!(
                "cannot move entry {} to {}: list has {} entries",
                from + 1,
                to + 1,
                len
            )));
        }
        if from != to {
            let path = self.paths.remove(from);
            self.paths.insert(to, path);
            debug!(from, to, "Input entry moved");
        }
        Ok(())
    }
}

impl From<Vec<PathBuf>> for InputList {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::new(paths)
    }
}
