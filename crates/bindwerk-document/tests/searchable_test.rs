// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

mod common;

use bindwerk_core::BindwerkError;
use bindwerk_document::{
    NoProgress, OcrPass, PasswordSession, RasterPage, SearchablePage, SearchablePageCompositor,
    compose_raster, searchable_copy,
};
use common::*;
use image::{DynamicImage, RgbImage};
use lopdf::Document;
use lopdf::content::Operation;

fn text_ops(ops: &[Operation]) -> usize {
    count_operator(ops, "Tj") + count_operator(ops, "TJ")
}

fn single_page_ops(page: &SearchablePage) -> (Document, Vec<Operation>) {
    let doc = Document::load_mem(page.bytes()).unwrap();
    let ids = page_ids(&doc);
    assert_eq!(ids.len(), 1);
    let ops = operators(&doc, ids[0]);
    (doc, ops)
}

fn blank_raster(width: u32, height: u32) -> RasterPage {
    RasterPage::new(DynamicImage::ImageRgb8(RgbImage::new(width, height)))
}

#[test]
fn empty_text_still_places_the_page_image() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "blank.pdf", "blank", 1);
    let compositor = SearchablePageCompositor::new(SolidRasterizer::new(300, 400), FixedText::new(""));

    let page = compositor.compose(&source, 0, "eng").unwrap();

    assert!(page.lines().is_empty());
    assert_eq!(page.size(), (300, 400));
    let (doc, ops) = single_page_ops(&page);
    assert_eq!(count_operator(&ops, "Do"), 1);
    assert_eq!(text_ops(&ops), 0);
    assert_page_size(&doc, page_ids(&doc)[0], 300.0, 400.0);
}

#[test]
fn recognised_lines_are_drawn_invisibly() {
    let page = compose_raster(&blank_raster(400, 600), "Invoice 42\nTotal due").unwrap();

    let (_, ops) = single_page_ops(&page);
    assert_eq!(text_ops(&ops), 2);
    let modes: Vec<i64> = ops
        .iter()
        .filter(|op| op.operator == "Tr")
        .map(|op| op.operands[0].as_i64().unwrap())
        .collect();
    assert_eq!(modes, vec![3, 3]);

    let placed: Vec<(f32, f32)> = page.lines().iter().map(|l| (l.x, l.y)).collect();
    assert_eq!(placed, vec![(10.0, 30.0), (10.0, 42.0)]);
}

#[test]
fn blank_lines_advance_but_draw_nothing() {
    let page = compose_raster(&blank_raster(400, 600), "top\n\nbottom").unwrap();

    assert_eq!(page.lines().len(), 3);
    assert_eq!(page.lines()[2].y, 54.0);
    let (_, ops) = single_page_ops(&page);
    assert_eq!(text_ops(&ops), 2);
}

#[test]
fn overflowing_text_is_truncated_the_same_way_every_time() {
    let text: String = (1..=10).map(|n| format!("line {n}\n")).collect();
    let raster = blank_raster(80, 100);

    let first = compose_raster(&raster, &text).unwrap();
    let second = compose_raster(&raster, &text).unwrap();

    assert_eq!(first.lines().len(), 5);
    assert_eq!(first.lines(), second.lines());
    assert_eq!(first.lines().last().unwrap().text, "line 5");
    let (_, ops) = single_page_ops(&first);
    assert_eq!(text_ops(&ops), 5);
}

#[test]
fn rasteriser_receives_one_based_single_page_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "long.pdf", "long", 6);
    let rasterizer = SolidRasterizer::new(10, 10);
    let seen = rasterizer.seen.clone();
    let compositor =
        SearchablePageCompositor::new(rasterizer, FixedText::new("x")).with_dpi(150);

    compositor.compose(&source, 4, "eng").unwrap();

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!((requests[0].first_page, requests[0].last_page), (5, 5));
    assert_eq!(requests[0].dpi, 150);
    assert_eq!(requests[0].path, source);
}

#[test]
fn password_is_forwarded_to_the_rasteriser() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "locked.pdf", "locked", 1);
    let rasterizer = SolidRasterizer::new(10, 10);
    let seen = rasterizer.seen.clone();
    let compositor = SearchablePageCompositor::new(rasterizer, FixedText::new(""));

    compositor
        .compose_with_password(&source, Some("s3cret"), 0, "eng")
        .unwrap();
    compositor
        .compose_with_password(&source, Some(""), 0, "eng")
        .unwrap();

    let passwords: Vec<Option<String>> =
        seen.lock().unwrap().iter().map(|r| r.password.clone()).collect();
    assert_eq!(passwords, vec![Some("s3cret".to_string()), None]);
}

#[test]
fn rasteriser_must_return_exactly_one_image() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "odd.pdf", "odd", 1);

    for images in [0, 2] {
        let compositor = SearchablePageCompositor::new(
            SolidRasterizer::new(10, 10).returning(images),
            FixedText::new("x"),
        );
        let result = compositor.compose(&source, 0, "eng");
        assert!(
            matches!(result, Err(BindwerkError::RasterError(_))),
            "{images} images"
        );
    }
}

#[test]
fn recogniser_errors_surface_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "scan.pdf", "scan", 1);
    let compositor = SearchablePageCompositor::new(SolidRasterizer::new(10, 10), BrokenRecognizer);

    match compositor.compose(&source, 0, "jpn+eng") {
        Err(BindwerkError::OcrError(detail)) => assert!(detail.contains("jpn+eng")),
        other => panic!("expected an OCR error, got {other:?}"),
    }
}

#[test]
fn searchable_copy_writes_next_to_the_input() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "minutes.pdf", "minutes", 3);
    let compositor =
        SearchablePageCompositor::new(SolidRasterizer::new(60, 90), FixedText::new("agreed"));
    let progress = RecordingProgress::default();

    let report = searchable_copy(
        &source,
        None,
        OcrPass::new(&compositor, "eng"),
        &mut PasswordSession::non_interactive(),
        &progress,
    )
    .unwrap();

    assert_eq!(report.output, dir.path().join("minutes_ocr.pdf"));
    assert_eq!(report.pages, 3);
    let copy = load(&report.output);
    assert_eq!(copy.get_pages().len(), 3);
    for page in page_ids(&copy) {
        assert_page_size(&copy, page, 60.0, 90.0);
    }
    assert_eq!(*progress.percents.lock().unwrap(), vec![0, 33, 66, 100]);
}

#[test]
fn searchable_copy_honours_an_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(dir.path(), "minutes.pdf", "minutes", 1);
    let target = dir.path().join("archive.pdf");
    let compositor = SearchablePageCompositor::new(SolidRasterizer::new(20, 20), FixedText::new(""));

    let report = searchable_copy(
        &source,
        Some(&target),
        OcrPass::new(&compositor, "eng"),
        &mut PasswordSession::non_interactive(),
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.output, target);
    assert!(target.exists());
    assert!(!dir.path().join("minutes_ocr.pdf").exists());
}
