// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — rasterising PDF pages and recognising their text.

pub mod raster;
pub mod recognize;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use raster::{PdftoppmRasterizer, RasterPage, RasterRequest, Rasterizer};
pub use recognize::{TesseractRecognizer, TextRecognizer};

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrsRecognizer};
