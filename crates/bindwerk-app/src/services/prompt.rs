// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Password prompt on the controlling terminal.

use std::path::Path;

use bindwerk_document::PasswordProvider;
use tracing::warn;

/// Asks for passwords on the terminal without echoing what is typed.
///
/// An empty answer, or a terminal that cannot be read, cancels.
pub struct TerminalPasswords;

impl PasswordProvider for TerminalPasswords {
    fn request_password(&mut self, path: &Path, attempt: u32) -> Option<String> {
        let prompt = format!(
            "Password for {} (attempt {attempt}, empty to cancel): ",
            path.display()
        );
        accepted_answer(rpassword::prompt_password(prompt))
    }

    fn password_rejected(&mut self, path: &Path) {
        eprintln!("Wrong password for {}.", path.display());
    }
}

/// The password typed, or `None` when the prompt was cancelled or failed.
fn accepted_answer(answer: std::io::Result<String>) -> Option<String> {
    match answer {
        Ok(line) => {
            let password = line.trim_end_matches(['\r', '\n']).to_string();
            (!password.is_empty()).then_some(password)
        }
        Err(err) => {
            warn!(%err, "Could not read password");
            None
        }
    }
}
