// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads the configuration, builds the OCR pipeline
// and runs the document workflows off the async runtime.
//
// Workflows block on file I/O and external programs, so each one runs inside
// `tokio::task::spawn_blocking` and owns everything it needs.

use std::path::{Path, PathBuf};

use bindwerk_core::AppConfig;
use bindwerk_core::config::RecognizerBackend;
use bindwerk_core::error::{BindwerkError, Result};
use bindwerk_core::types::{InputList, PageSelection};
use bindwerk_document::{
    MergeReport, OcrPass, OcrReport, PasswordSession, PdftoppmRasterizer, SearchablePageCompositor,
    SplitReport, TesseractRecognizer,
};
use tracing::{debug, info};

use super::data_dir;
use super::progress::TerminalProgress;
use super::prompt::TerminalPasswords;

/// Recognition settings for one run, after command-line overrides.
#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub language: String,
    pub dpi: u32,
}

/// Shared application services.
#[derive(Clone)]
pub struct AppServices {
    config: AppConfig,
    show_progress: bool,
}

impl AppServices {
    /// Load the configuration from `config_path`, or from the default
    /// location when it exists there.
    pub fn init(config_path: Option<&Path>, show_progress: bool) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load(path)?,
            None => {
                let path = data_dir::default_config_path();
                if path.is_file() {
                    AppConfig::load(&path)?
                } else {
                    debug!(path = %path.display(), "No configuration file, using defaults");
                    AppConfig::default()
                }
            }
        };
        info!(recognizer = ?config.recognizer, language = %config.ocr_language, "App services initialised");
        Ok(Self {
            config,
            show_progress,
        })
    }

    /// Configured OCR settings with `language`/`dpi` overriding them.
    pub fn ocr_settings(&self, language: Option<String>, dpi: Option<u32>) -> Result<OcrSettings> {
        let options = self.config.ocr_options();
        let settings = OcrSettings {
            language: language.unwrap_or(options.language),
            dpi: dpi.unwrap_or(options.dpi),
        };
        if settings.language.trim().is_empty() {
            return Err(BindwerkError::InvalidInput(
                "the OCR language must not be empty".to_string(),
            ));
        }
        if settings.dpi == 0 {
            return Err(BindwerkError::InvalidInput(
                "the raster resolution must be positive".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Build the rasterise/recognise pipeline for the configured backend.
    pub fn compositor(&self, dpi: u32) -> Result<SearchablePageCompositor> {
        let rasterizer = PdftoppmRasterizer::new(self.config.pdftoppm_command.clone());
        let compositor = match self.config.recognizer {
            RecognizerBackend::Tesseract => SearchablePageCompositor::new(
                rasterizer,
                TesseractRecognizer::new(self.config.tesseract_command.clone()),
            ),
            RecognizerBackend::Ocrs => self.ocrs_compositor(rasterizer)?,
        };
        Ok(compositor.with_dpi(dpi))
    }

    #[cfg(feature = "ocr")]
    fn ocrs_compositor(&self, rasterizer: PdftoppmRasterizer) -> Result<SearchablePageCompositor> {
        let recognizer =
            bindwerk_document::OcrsRecognizer::from_model_dir(self.config.ocrs_model_dir.as_deref())?;
        Ok(SearchablePageCompositor::new(rasterizer, recognizer))
    }

    #[cfg(not(feature = "ocr"))]
    fn ocrs_compositor(&self, _rasterizer: PdftoppmRasterizer) -> Result<SearchablePageCompositor> {
        Err(BindwerkError::Config(
            "the ocrs recognizer needs a build with the `ocr` feature; use \"tesseract\" instead"
                .to_string(),
        ))
    }

    fn progress(&self) -> TerminalProgress {
        if self.show_progress {
            TerminalProgress::new()
        } else {
            TerminalProgress::hidden()
        }
    }

    fn compositor_for(&self, ocr: Option<&OcrSettings>) -> Result<Option<SearchablePageCompositor>> {
        ocr.map(|settings| self.compositor(settings.dpi)).transpose()
    }

    // -- Workflows -----------------------------------------------------------

    pub async fn merge(
        &self,
        inputs: InputList,
        output: PathBuf,
        ocr: Option<OcrSettings>,
    ) -> Result<MergeReport> {
        let compositor = self.compositor_for(ocr.as_ref())?;
        let progress = self.progress();
        run_blocking(move || {
            let pass = pass_for(compositor.as_ref(), ocr.as_ref());
            let mut session = PasswordSession::new(TerminalPasswords);
            bindwerk_document::merge(&inputs, &output, pass, &mut session, &progress)
        })
        .await
    }

    pub async fn split(
        &self,
        inputs: Vec<PathBuf>,
        output_dir: PathBuf,
        selection: PageSelection,
        ocr: Option<OcrSettings>,
    ) -> Result<SplitReport> {
        let compositor = self.compositor_for(ocr.as_ref())?;
        let progress = self.progress();
        run_blocking(move || {
            let pass = pass_for(compositor.as_ref(), ocr.as_ref());
            let mut session = PasswordSession::new(TerminalPasswords);
            bindwerk_document::split(&inputs, &output_dir, &selection, pass, &mut session, &progress)
        })
        .await
    }

    pub async fn searchable_copy(
        &self,
        input: PathBuf,
        output: Option<PathBuf>,
        ocr: OcrSettings,
    ) -> Result<OcrReport> {
        let compositor = self.compositor(ocr.dpi)?;
        let progress = self.progress();
        run_blocking(move || {
            let pass = OcrPass::new(&compositor, &ocr.language);
            let mut session = PasswordSession::new(TerminalPasswords);
            bindwerk_document::searchable_copy(
                &input,
                output.as_deref(),
                pass,
                &mut session,
                &progress,
            )
        })
        .await
    }
}

fn pass_for<'a>(
    compositor: Option<&'a SearchablePageCompositor>,
    ocr: Option<&'a OcrSettings>,
) -> Option<OcrPass<'a>> {
    match (compositor, ocr) {
        (Some(compositor), Some(settings)) => Some(OcrPass::new(compositor, &settings.language)),
        _ => None,
    }
}

/// Run `work` on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| BindwerkError::Io(std::io::Error::other(err)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services(config: AppConfig) -> AppServices {
        AppServices {
            config,
            show_progress: false,
        }
    }

    #[test]
    fn overrides_win_over_the_configuration() {
        let svc = services(AppConfig::default());
        let settings = svc.ocr_settings(Some("eng".into()), Some(150)).unwrap();
        assert_eq!(settings.language, "eng");
        assert_eq!(settings.dpi, 150);

        let settings = svc.ocr_settings(None, None).unwrap();
        assert_eq!(settings.language, "jpn+eng");
        assert_eq!(settings.dpi, 300);
    }

    #[test]
    fn blank_language_override_is_rejected() {
        let svc = services(AppConfig::default());
        assert!(svc.ocr_settings(Some("  ".into()), None).is_err());
        assert!(svc.ocr_settings(None, Some(0)).is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindwerk.json");
        std::fs::write(&path, r#"{ "ocr_language": "deu", "raster_dpi": 200 }"#).unwrap();

        let svc = AppServices::init(Some(&path), false).unwrap();
        assert_eq!(svc.config.ocr_language, "deu");
        assert_eq!(svc.config.raster_dpi, 200);
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppServices::init(Some(&dir.path().join("absent.json")), false);
        assert!(matches!(result, Err(BindwerkError::Io(_))));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocrs_backend_needs_the_ocr_feature() {
        let config = AppConfig {
            recognizer: RecognizerBackend::Ocrs,
            ..AppConfig::default()
        };
        assert!(matches!(
            services(config).compositor(300),
            Err(BindwerkError::Config(_))
        ));
    }
}
