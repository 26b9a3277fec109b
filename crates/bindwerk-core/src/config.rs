// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BindwerkError, Result};
use crate::types::{DEFAULT_OCR_LANGUAGE, DEFAULT_RASTER_DPI, OcrOptions};

/// Which text-recognition engine performs OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerBackend {
    /// The `tesseract` command-line program.
    Tesseract,
    /// The pure-Rust `ocrs` engine (requires the `ocr` feature).
    Ocrs,
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language tag handed to the recognition engine, e.g. `jpn+eng`.
    pub ocr_language: String,
    /// Resolution pages are rasterised at before recognition.
    pub raster_dpi: u32,
    pub recognizer: RecognizerBackend,
    /// Program used to rasterise pages.
    pub pdftoppm_command: String,
    /// Program used for recognition when `recognizer` is `tesseract`.
    pub tesseract_command: String,
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// Falls back to the ocrs cache directory when unset.
    pub ocrs_model_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            raster_dpi: DEFAULT_RASTER_DPI,
            recognizer: RecognizerBackend::Tesseract,
            pdftoppm_command: "pdftoppm".to_string(),
            tesseract_command: "tesseract".to_string(),
            ocrs_model_dir: None,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        debug!(?config, "Effective configuration");
        Ok(config)
    }

    /// Reject settings no operation can run with.
    pub fn validate(&self) -> Result<()> {
        if self.ocr_language.trim().is_empty() {
            return Err(BindwerkError::Config("ocr_language must not be empty".into()));
        }
        if self.raster_dpi == 0 {
            return Err(BindwerkError::Config("raster_dpi must be positive".into()));
        }
        Ok(())
    }

    /// OCR options derived from these settings.
    pub fn ocr_options(&self) -> OcrOptions {
        OcrOptions {
            language: self.ocr_language.clone(),
            dpi: self.raster_dpi,
        }
    }
}
