// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents (decrypting them when needed) and
// expose their pages using the `lopdf` crate.

use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use lopdf::{Document, ObjectId};
use tracing::{debug, info, instrument};

use super::password::PasswordSession;

/// An opened, readable PDF document.
///
/// Encrypted documents are decrypted on open; the password that worked is
/// kept so external tools (the rasteriser) can open the same file.
pub struct PdfReader {
    document: Document,
    source_path: PathBuf,
    password: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem, asking `session` for a password if the
    /// document is encrypted.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, session: &mut PasswordSession) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let bytes = std::fs::read(path_ref)?;
        let document = Document::load_mem(&bytes).map_err(|err| {
            BindwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        if !document.is_encrypted() {
            debug!(pages = document.get_pages().len(), "PDF loaded");
            return Ok(Self {
                document,
                source_path: path_ref.to_path_buf(),
                password: None,
            });
        }

        info!("PDF is encrypted, looking for a password");
        let (document, password) = session.unlock(path_ref, |candidate| {
            let mut attempt = Document::load_mem(&bytes).ok()?;
            attempt.decrypt(candidate).ok()?;
            Some(attempt)
        })?;

        debug!(pages = document.get_pages().len(), "Encrypted PDF loaded");
        Ok(Self {
            document,
            source_path: path_ref.to_path_buf(),
            password: Some(password),
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// The file the document was read from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The password that decrypted the document, if it was encrypted.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Object id of the page at zero-based `index`.
    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        let pages = self.document.get_pages();
        u32::try_from(index + 1)
            .ok()
            .and_then(|number| pages.get(&number).copied())
            .ok_or_else(|| {
                BindwerkError::InvalidInput(format!(
                    "page {} out of range (document has {} pages)",
                    index + 1,
                    pages.len()
                ))
            })
    }
}
