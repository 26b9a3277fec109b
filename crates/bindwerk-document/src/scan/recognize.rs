// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turning a page bitmap into plain text.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use bindwerk_core::error::{BindwerkError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

use crate::temp::TempArtifact;

/// Recognises the text in a bitmap.
///
/// `language` is a tag such as `eng` or `jpn+eng` (try several languages at
/// once). Engines that cannot choose a language ignore it. A page without
/// text yields an empty string, not an error.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String>;
}

/// Recogniser backed by the `tesseract` program.
///
/// The bitmap is written to a temporary PNG and recognised with
/// `tesseract <png> stdout -l <language>`.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: String,
}

impl TesseractRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn command_args(image_path: &Path, language: &str) -> Vec<OsString> {
        vec![
            image_path.into(),
            "stdout".into(),
            "-l".into(),
            language.into(),
        ]
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextRecognizer for TesseractRecognizer {
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), language = %language))]
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        info!("Starting OCR text recognition");

        let artifact = TempArtifact::create("bindwerk-ocr-", ".png")?;
        if let Err(err) = image.save_with_format(artifact.path(), ImageFormat::Png) {
            artifact.cleanup();
            return Err(BindwerkError::ImageError(format!(
                "failed to write page image for recognition: {}",
                err
            )));
        }

        let output = Command::new(&self.command)
            .args(Self::command_args(artifact.path(), language))
            .output();
        artifact.cleanup();

        let output = output.map_err(|err| {
            BindwerkError::OcrError(format!("failed to execute {}: {}", self.command, err))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BindwerkError::OcrError(format!(
                "{} returned {} for language {}: {}",
                self.command,
                output.status,
                language,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}
