// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure-Rust text recognition using the `ocrs` crate, whose neural network
// models are executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// bindwerk-document = { path = "crates/bindwerk-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs two model files:
//
// - `text-detection.rten` locates text regions in the image.
// - `text-recognition.rten` decodes characters from detected regions.
//
// Running the `ocrs-cli` tool once downloads both to the default cache
// directory, `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`).
//
// The models recognise Latin script only, so the language tag passed to
// `recognize` is ignored.

use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::recognize::TextRecognizer;

/// Default directory for cached OCR model files.
///
/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs` when
/// `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Where to load the two models from.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(BindwerkError::OcrError(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download models",
                    kind,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text recogniser running the `ocrs` engine in-process.
///
/// Model loading is the expensive step; build one recogniser per batch and
/// reuse it for every page. `ocrs` and `rten` must be compiled with
/// optimisations, debug builds are 10-100x slower.
pub struct OcrsRecognizer {
    engine: OcrsEngine,
}

impl OcrsRecognizer {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            BindwerkError::OcrError(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;

        info!("Loading OCR recognition model");
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                BindwerkError::OcrError(format!(
                    "failed to load recognition model from {}: {}",
                    config.recognition_model_path.display(),
                    err
                ))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            BindwerkError::OcrError(format!("failed to initialise OCR engine: {}", err))
        })?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Load models from `dir`, or from the default cache directory.
    pub fn from_model_dir(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::new(OcrConfig::from_dir(dir)),
            None => Self::new(OcrConfig::default()),
        }
    }
}

impl TextRecognizer for OcrsRecognizer {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        debug!(language, "ocrs ignores the language tag");

        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            BindwerkError::OcrError(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self.engine.prepare_input(source).map_err(|err| {
            BindwerkError::OcrError(format!("OCR preprocessing failed: {}", err))
        })?;

        let text = self.engine.get_text(&input).map_err(|err| {
            BindwerkError::OcrError(format!("OCR text recognition failed: {}", err))
        })?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}
