// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a plain sentence with a suggestion. The
// orchestrating front end shows exactly one of these per failed operation.

use crate::error::BindwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying the same thing again may work.
    Transient,
    /// The user must do something first (install a tool, pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying: damaged file, cancelled prompt.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the operation again could succeed unchanged.
    pub retriable: bool,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BindwerkError` into a `HumanError`.
pub fn humanize_error(err: &BindwerkError) -> HumanError {
    match err {
        // -- Input errors --
        BindwerkError::PdfError(detail) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: format!(
                "The file may be damaged. Try opening it in a viewer first to check it works. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        BindwerkError::Aborted { file } => HumanError {
            message: format!(
                "Reading {} was cancelled.",
                file.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string())
            ),
            suggestion: "The operation stopped at this file; files written before it are kept. Run it again and enter the password when asked.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BindwerkError::InvalidInput(detail) => HumanError {
            message: "The request could not be carried out.".into(),
            suggestion: format!("Check the files and options you supplied. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Rasterisation / recognition --
        BindwerkError::RasterError(detail) => humanize_tool_error(
            detail,
            "A page could not be turned into an image.",
            "pdftoppm",
            "poppler-utils",
        ),

        BindwerkError::ImageError(_) => HumanError {
            message: "A page image could not be processed.".into(),
            suggestion: "Try again without OCR, or re-save the PDF from another program first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BindwerkError::OcrError(detail) => {
            if detail.contains("model") {
                HumanError {
                    message: "The text recognition models are missing.".into(),
                    suggestion: "Run `ocrs-cli` once to download the models, or point the configuration at a model directory.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                humanize_tool_error(
                    detail,
                    "Text recognition didn't work on this page.",
                    "tesseract",
                    "tesseract-ocr and the language packs you asked for",
                )
            }
        }

        // -- Configuration --
        BindwerkError::Config(detail) => HumanError {
            message: "The configuration file could not be used.".into(),
            suggestion: format!("Fix the configuration file or run without it. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Storage --
        BindwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or folder couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission to read or write a file was denied.".into(),
                    suggestion: "Check the file permissions, or choose a different output location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BindwerkError::Serialization(_) => HumanError {
            message: "The configuration file is not valid JSON.".into(),
            suggestion: "Fix the syntax of the configuration file, or run without it.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Map a failure of an external helper program to a message that names the
/// program and the package that provides it.
fn humanize_tool_error(detail: &str, message: &str, program: &str, package: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("failed to execute") || lower.contains("not found") {
        HumanError {
            message: format!("The `{program}` program is not available."),
            suggestion: format!("Install {package} and make sure `{program}` is on your PATH."),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: message.into(),
            suggestion: format!("Try again. If this keeps happening, the file may be damaged. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
