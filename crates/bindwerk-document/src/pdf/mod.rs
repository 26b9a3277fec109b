// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading (with decryption) and assembling output documents.

pub mod output;
pub mod password;
pub mod reader;

pub use output::OutputDocument;
pub use password::{NoPasswords, PasswordProvider, PasswordSession, ScriptedPasswords};
pub use reader::PdfReader;
