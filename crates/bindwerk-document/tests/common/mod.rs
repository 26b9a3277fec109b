// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures: generated PDFs and in-process rasteriser/recogniser doubles.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bindwerk_core::error::{BindwerkError, Result};
use bindwerk_document::{ProgressObserver, RasterPage, RasterRequest, Rasterizer, TextRecognizer};
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Stream, dictionary,
};

/// Write a PDF with `pages` pages to `dir/name`. Page `n` shows
/// `"{label} page {n}"`. MediaBox and Resources live on the page tree node,
/// so copied pages must pick them up through inheritance.
pub fn write_fixture(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for number in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{label} page {number}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::string_literal("bindwerk-fixture"),
            Object::string_literal("bindwerk-fixture"),
        ]),
    );

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Encrypt the PDF at `path` in place so it needs `user_password` to open.
pub fn encrypt_fixture(path: &Path, user_password: &str) {
    let mut doc = Document::load(path).unwrap();
    let version = EncryptionVersion::V1 {
        document: &doc,
        owner_password: "owner-secret",
        user_password,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();
    doc.save(path).unwrap();
}

pub fn load(path: &Path) -> Document {
    Document::load(path).unwrap()
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Decoded content stream bytes of every page, in page order.
pub fn page_contents(doc: &Document) -> Vec<Vec<u8>> {
    page_ids(doc)
        .into_iter()
        .map(|id| doc.get_page_content(id).unwrap())
        .collect()
}

pub fn page_text(doc: &Document, page_index: usize) -> String {
    String::from_utf8_lossy(&page_contents(doc)[page_index]).into_owned()
}

pub fn operators(doc: &Document, page_id: ObjectId) -> Vec<Operation> {
    let bytes = doc.get_page_content(page_id).unwrap();
    Content::decode(&bytes).unwrap().operations
}

pub fn count_operator(ops: &[Operation], name: &str) -> usize {
    ops.iter().filter(|op| op.operator == name).count()
}

/// MediaBox of a page as `[llx, lly, urx, ury]`.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Vec<f32> {
    let page = doc.get_dictionary(page_id).unwrap();
    page.get(b"MediaBox")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|value| value.as_float().unwrap())
        .collect()
}

/// A rasteriser request as seen by [`SolidRasterizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub path: PathBuf,
    pub first_page: u32,
    pub last_page: u32,
    pub dpi: u32,
    pub password: Option<String>,
}

/// Returns solid white bitmaps of a fixed size and records every request.
pub struct SolidRasterizer {
    pub width: u32,
    pub height: u32,
    /// Images returned per request; real rasterisers return one per page.
    pub images_per_request: usize,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl SolidRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            images_per_request: 1,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(mut self, images: usize) -> Self {
        self.images_per_request = images;
        self
    }
}

impl Rasterizer for SolidRasterizer {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<RasterPage>> {
        self.seen.lock().unwrap().push(SeenRequest {
            path: request.path.to_path_buf(),
            first_page: request.first_page,
            last_page: request.last_page,
            dpi: request.dpi,
            password: request.password.map(str::to_string),
        });
        let image = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        Ok((0..self.images_per_request)
            .map(|_| RasterPage::new(DynamicImage::ImageRgb8(image.clone())))
            .collect())
    }
}

/// Recognises the same text on every page and records the language asked for.
pub struct FixedText {
    pub text: String,
    pub languages: Arc<Mutex<Vec<String>>>,
}

impl FixedText {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            languages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl TextRecognizer for FixedText {
    fn recognize(&self, _image: &DynamicImage, language: &str) -> Result<String> {
        self.languages.lock().unwrap().push(language.to_string());
        Ok(self.text.clone())
    }
}

/// Fails every recognition.
pub struct BrokenRecognizer;

impl TextRecognizer for BrokenRecognizer {
    fn recognize(&self, _image: &DynamicImage, language: &str) -> Result<String> {
        Err(BindwerkError::OcrError(format!(
            "no traineddata for {language}"
        )))
    }
}

/// Records every progress event.
#[derive(Default)]
pub struct RecordingProgress {
    pub started: Mutex<Vec<(PathBuf, usize)>>,
    pub percents: Mutex<Vec<u8>>,
    pub finished: Mutex<bool>,
}

impl ProgressObserver for RecordingProgress {
    fn document_started(&self, path: &Path, pages: usize) {
        self.started.lock().unwrap().push((path.to_path_buf(), pages));
    }

    fn progress(&self, percent: u8) {
        self.percents.lock().unwrap().push(percent);
    }

    fn finished(&self) {
        *self.finished.lock().unwrap() = true;
    }
}

/// Assert the page is exactly `width x height` points.
pub fn assert_page_size(doc: &Document, page_id: ObjectId, width: f32, height: f32) {
    assert_eq!(media_box(doc, page_id), vec![0.0, 0.0, width, height]);
}
