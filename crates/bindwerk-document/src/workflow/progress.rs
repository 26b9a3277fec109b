// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting for long-running batches.

use std::path::Path;

/// Receives coarse progress while a batch runs.
///
/// Percentages describe the current document only and restart at 0 for each
/// document, so they are not monotonic across a batch.
pub trait ProgressObserver: Send + Sync {
    /// A new document with `pages` pages to process is starting.
    fn document_started(&self, _path: &Path, _pages: usize) {}

    /// `percent` (0-100) of the current document's pages are done.
    fn progress(&self, percent: u8);

    /// The whole batch finished successfully.
    fn finished(&self) {}
}

/// Ignores all progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn progress(&self, _percent: u8) {}
}

/// Percentage of `done` out of `total`, rounded down. An empty document is
/// complete.
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}
