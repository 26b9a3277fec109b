// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// "1,3,5-7" style page selections typed by a user.

use std::collections::BTreeSet;
use std::num::IntErrorKind;

use tracing::debug;

/// Turns a page range expression into zero-based page indices.
///
/// Expressions use 1-based page numbers as shown to the user. Tokens are
/// separated by `,`; a token is either a single page (`4`) or an inclusive
/// span (`2-6`). Spans are clamped to the document, single pages outside it
/// are dropped, and tokens that are not numbers are skipped. Resolution never
/// fails: the worst case is an empty result.
pub struct PageRangeResolver;

impl PageRangeResolver {
    /// Resolve `expression` against a document of `total_pages` pages.
    ///
    /// The result is strictly increasing and every index is `< total_pages`.
    /// A blank expression yields no pages; callers that want "blank means
    /// everything" should use [`crate::PageSelection::from_input`].
    pub fn resolve(expression: &str, total_pages: usize) -> Vec<usize> {
        let total = i64::try_from(total_pages).unwrap_or(i64::MAX);
        let mut pages: BTreeSet<i64> = BTreeSet::new();

        for token in expression.split(',') {
            let token = token.trim();

            if token.contains('-') {
                let Some((start, end)) = parse_span(token) else {
                    debug!(token, "Skipping malformed page span");
                    continue;
                };
                let start = start.max(1);
                let end = end.min(total);
                // An inverted span is simply empty.
                pages.extend(start..=end);
            } else {
                match parse_page_number(token) {
                    Some(page) if (1..=total).contains(&page) => {
                        pages.insert(page);
                    }
                    Some(page) => debug!(page, total_pages, "Skipping out-of-range page"),
                    None => debug!(token, "Skipping malformed page number"),
                }
            }
        }

        pages
            .into_iter()
            .filter_map(|page| usize::try_from(page - 1).ok())
            .collect()
    }
}

/// Parse `start-end`. Exactly one `-` separating two numbers is accepted.
fn parse_span(token: &str) -> Option<(i64, i64)> {
    let mut parts = token.split('-');
    let start = parse_page_number(parts.next()?)?;
    let end = parse_page_number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((start, end))
}

/// Parse one number, tolerating surrounding whitespace. Numbers too large to
/// represent saturate so they still clamp like any other oversized value.
fn parse_page_number(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(i64::MAX),
        Err(_) => None,
    }
}
