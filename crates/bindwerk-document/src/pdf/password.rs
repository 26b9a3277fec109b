// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Passwords for encrypted PDFs — where they come from and how long they are
// remembered.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use bindwerk_core::error::{BindwerkError, Result};
use tracing::{debug, info, instrument, warn};

/// Source of passwords for encrypted documents, typically a prompt.
pub trait PasswordProvider: Send {
    /// Ask for the password of `path`. `attempt` counts from 1 for each
    /// document. Returning `None` (or an empty string) cancels reading the
    /// document.
    fn request_password(&mut self, path: &Path, attempt: u32) -> Option<String>;

    /// The last password returned for `path` did not decrypt it.
    fn password_rejected(&mut self, _path: &Path) {}
}

/// Never supplies a password; encrypted documents are aborted.
pub struct NoPasswords;

impl PasswordProvider for NoPasswords {
    fn request_password(&mut self, _path: &Path, _attempt: u32) -> Option<String> {
        None
    }
}

/// Hands out a fixed sequence of answers, then cancels.
///
/// A single known password is `ScriptedPasswords::new([Some(pw)])`.
#[derive(Debug, Default)]
pub struct ScriptedPasswords {
    answers: VecDeque<Option<String>>,
    rejected: usize,
}

impl ScriptedPasswords {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            rejected: 0,
        }
    }

    /// How many of the supplied answers were wrong.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl PasswordProvider for ScriptedPasswords {
    fn request_password(&mut self, _path: &Path, _attempt: u32) -> Option<String> {
        self.answers.pop_front().flatten()
    }

    fn password_rejected(&mut self, _path: &Path) {
        self.rejected += 1;
    }
}

/// Passwords remembered for the lifetime of one batch, keyed by file path,
/// plus the provider asked when nothing remembered works.
pub struct PasswordSession {
    cache: HashMap<PathBuf, String>,
    provider: Box<dyn PasswordProvider>,
}

impl PasswordSession {
    pub fn new(provider: impl PasswordProvider + 'static) -> Self {
        Self {
            cache: HashMap::new(),
            provider: Box::new(provider),
        }
    }

    /// A session that aborts every encrypted document.
    pub fn non_interactive() -> Self {
        Self::new(NoPasswords)
    }

    /// The remembered password for `path`, if any.
    pub fn cached(&self, path: &Path) -> Option<&str> {
        self.cache.get(path).map(String::as_str)
    }

    /// Find a password for `path` that `try_password` accepts.
    ///
    /// Order: the remembered password, then the empty user password, then the
    /// provider, asked again after every rejection until it cancels. The
    /// winning password is remembered and returned alongside the value
    /// `try_password` produced.
    #[instrument(skip(self, try_password), fields(path = %path.display()))]
    pub fn unlock<T>(
        &mut self,
        path: &Path,
        mut try_password: impl FnMut(&str) -> Option<T>,
    ) -> Result<(T, String)> {
        if let Some(cached) = self.cache.get(path) {
            if let Some(value) = try_password(cached) {
                debug!("Remembered password accepted");
                return Ok((value, cached.clone()));
            }
            warn!("Remembered password no longer works");
        }

        if let Some(value) = try_password("") {
            debug!("Document opened with the empty user password");
            return Ok((value, String::new()));
        }

        let mut attempt = 1;
        loop {
            let password = match self.provider.request_password(path, attempt) {
                Some(password) if !password.is_empty() => password,
                _ => {
                    info!(attempt, "Password prompt cancelled");
                    return Err(BindwerkError::Aborted {
                        file: path.to_path_buf(),
                    });
                }
            };

            if let Some(value) = try_password(&password) {
                info!(attempt, "Password accepted");
                self.cache.insert(path.to_path_buf(), password.clone());
                return Ok((value, password));
            }

            warn!(attempt, "Password rejected");
            self.provider.password_rejected(path);
            attempt += 1;
        }
    }
}

impl Default for PasswordSession {
    fn default() -> Self {
        Self::non_interactive()
    }
}
