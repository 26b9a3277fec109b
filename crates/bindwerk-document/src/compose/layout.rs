// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placement of recognised text on a searchable page.
//
// Text is not aligned with the glyphs in the scan. Lines are stacked from a
// fixed baseline near the bottom of the page upwards, which is enough for
// search and copy/paste. The constants are in points and do not scale with
// the page.

/// Left edge of every line.
pub const TEXT_LEFT_MARGIN: f32 = 10.0;
/// Baseline of the first line, measured from the bottom of the page.
pub const FIRST_BASELINE: f32 = 30.0;
/// Distance between consecutive baselines.
pub const LINE_SPACING: f32 = 12.0;
/// Lines stop once the next baseline would pass this distance from the top.
pub const TOP_MARGIN: f32 = 20.0;
/// Font size of the invisible text.
pub const FONT_SIZE: f32 = 10.0;

/// One line of text and the position of its baseline, in PDF coordinates
/// (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Lay out `text` on a page `page_height` points tall.
///
/// The text is split on line breaks; NUL and form-feed characters emitted by
/// recognition engines are dropped first. The first line always gets a slot.
/// After each line the cursor moves up by [`LINE_SPACING`]; once it is above
/// `page_height - TOP_MARGIN` the remaining lines are dropped. For a given
/// page height the number of lines kept is therefore fixed.
pub fn layout_text_lines(text: &str, page_height: f32) -> Vec<PlacedLine> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '\u{0000}' && *c != '\u{000C}')
        .collect();

    let limit = page_height - TOP_MARGIN;
    let mut placed = Vec::new();
    let mut y = FIRST_BASELINE;

    for line in cleaned.lines() {
        placed.push(PlacedLine {
            text: line.to_string(),
            x: TEXT_LEFT_MARGIN,
            y,
        });
        y += LINE_SPACING;
        if y > limit {
            break;
        }
    }

    placed
}

/// How many lines fit on a page `page_height` points tall.
pub fn line_capacity(page_height: f32) -> usize {
    let limit = page_height - TOP_MARGIN;
    let mut count = 1;
    let mut y = FIRST_BASELINE + LINE_SPACING;
    while y <= limit {
        count += 1;
        y += LINE_SPACING;
    }
    count
}
