// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped temporary files handed to external programs (rasteriser output,
// recogniser input).

use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use tempfile::TempPath;
use tracing::{debug, warn};

/// A temporary file that lives for one processing step.
///
/// Call [`cleanup`](Self::cleanup) once the file has been consumed. Dropping
/// the artifact without calling it still deletes the file, but any failure is
/// then silent.
#[derive(Debug)]
pub struct TempArtifact {
    path: TempPath,
}

/// A temporary file that could not be deleted. Only leaks disk space, never
/// affects the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not delete temporary file {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl TempArtifact {
    /// Create an empty temporary file in the system temp directory.
    pub fn create(prefix: &str, suffix: &str) -> Result<Self> {
        Self::create_in(std::env::temp_dir(), prefix, suffix)
    }

    /// Create an empty temporary file inside `dir`.
    pub fn create_in(dir: impl AsRef<Path>, prefix: &str, suffix: &str) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir.as_ref())
            .map_err(BindwerkError::Io)?;
        let path = file.into_temp_path();
        debug!(path = %path.display(), "Temporary artifact created");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, best effort.
    ///
    /// A file that is already gone counts as cleaned up. Any other failure is
    /// logged and returned as a warning.
    pub fn cleanup(self) -> Option<CleanupWarning> {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => {
                debug!(path = %path.display(), "Temporary artifact removed");
                None
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                let warning = CleanupWarning {
                    path,
                    reason: err.to_string(),
                };
                warn!(%warning, "Temporary artifact left behind");
                Some(warning)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create_in(dir.path(), "page-", ".png").unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".png"));

        assert_eq!(artifact.cleanup(), None);
        assert!(!path.exists());
    }

    #[test]
    fn already_deleted_file_is_not_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create_in(dir.path(), "page-", ".png").unwrap();
        std::fs::remove_file(artifact.path()).unwrap();

        assert_eq!(artifact.cleanup(), None);
    }

    #[cfg(unix)]
    #[test]
    fn undeletable_path_becomes_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create_in(dir.path(), "page-", ".png").unwrap();
        let path = artifact.path().to_path_buf();

        // A non-empty directory in place of the file cannot be removed with
        // remove_file.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let warning = artifact.cleanup().expect("expected a cleanup warning");
        assert_eq!(warning.path, path);
        assert!(warning.to_string().contains("could not delete"));
    }
}
