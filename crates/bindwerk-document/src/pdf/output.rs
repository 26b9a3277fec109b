// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output document — collects pages copied out of other PDFs, in insertion
// order, and writes them out once.

use std::collections::HashMap;
use std::path::Path;

use bindwerk_core::error::{BindwerkError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, info, instrument, warn};

use super::reader::PdfReader;
use crate::compose::SearchablePage;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A PDF under construction.
///
/// Pages are appended one at a time (from opened documents or from
/// composited searchable pages) and keep their insertion order. Bookmarks,
/// metadata and forms of the sources are not carried over.
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl OutputDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            page_count: 0,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    // -- Appending ------------------------------------------------------------

    /// Append a copy of the page at zero-based `index` of `reader`.
    #[instrument(skip(self, reader), fields(index))]
    pub fn append_page(&mut self, reader: &PdfReader, index: usize) -> Result<()> {
        let page_id = reader.page_id(index)?;
        self.append_page_object(reader.document(), page_id)
    }

    /// Append the single page of a composited searchable page.
    #[instrument(skip_all, fields(bytes_len = page.bytes().len()))]
    pub fn append_searchable(&mut self, page: &SearchablePage) -> Result<()> {
        let source = Document::load_mem(page.bytes()).map_err(|err| {
            BindwerkError::PdfError(format!("failed to load composited page: {}", err))
        })?;
        let page_id = source.get_pages().get(&1).copied().ok_or_else(|| {
            BindwerkError::PdfError("composited page document has no pages".to_string())
        })?;
        self.append_page_object(&source, page_id)
    }

    /// Copy the page `page_id` of `source`, with everything it references,
    /// and add it as the last page.
    fn append_page_object(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let page_dict = source
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|err| {
                BindwerkError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
            })?
            .clone();

        let mut cloner = ObjectCloner::new(source, &mut self.document);
        let new_page_id = cloner.reserve(page_id);

        let mut new_page = cloner.clone_dictionary(&page_dict)?;
        for (key, value) in inherited_attributes(source, &page_dict) {
            let cloned = cloner.clone_object(&value)?;
            new_page.set(key, cloned);
        }
        new_page.set("Parent", Object::Reference(self.pages_id));
        self.document
            .objects
            .insert(new_page_id, Object::Dictionary(new_page));

        let pages = self
            .document
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| BindwerkError::PdfError(format!("no page tree: {}", err)))?;
        match pages.get_mut(b"Kids") {
            Ok(Object::Array(kids)) => kids.push(Object::Reference(new_page_id)),
            _ => {
                return Err(BindwerkError::PdfError(
                    "/Kids of the page tree is not an array".to_string(),
                ));
            }
        }
        self.page_count += 1;
        pages.set("Count", self.page_count as i64);

        debug!(page_count = self.page_count, "Page appended");
        Ok(())
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            BindwerkError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;
        Ok(output)
    }

    /// Write the document to `path`, consuming it.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            pages = self.page_count,
            bytes = bytes.len(),
            "Wrote PDF to {}",
            path.as_ref().display()
        );
        Ok(())
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Attributes the page inherits from ancestors and does not set itself.
fn inherited_attributes(source: &Document, page: &Dictionary) -> Vec<(Vec<u8>, Object)> {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Page trees are shallow; the bound only guards against cycles.
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth > 64 {
            warn!(?parent_id, "Page tree too deep, stopping attribute inheritance");
            break;
        }
        let Ok(node) = source.get_object(parent_id).and_then(Object::as_dict) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            let already_set =
                page.has(key) || inherited.iter().any(|(existing, _)| existing.as_slice() == key);
            if !already_set {
                if let Ok(value) = node.get(key) {
                    inherited.push((key.to_vec(), value.clone()));
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    inherited
}

/// Deep-copies objects from one document into another.
///
/// Each source object is copied at most once per page, so shared resources
/// and reference cycles (annotations pointing back at their page) are
/// preserved. `/Parent` links are dropped; the caller re-attaches the page.
struct ObjectCloner<'a> {
    source: &'a Document,
    target: &'a mut Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCloner<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            copied: HashMap::new(),
        }
    }

    /// Allocate the target id for `source_id` before its content is copied.
    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        let new_id = self.target.new_object_id();
        self.copied.insert(source_id, new_id);
        new_id
    }

    fn clone_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            new_dict.set(key.clone(), self.clone_object(value)?);
        }
        Ok(new_dict)
    }

    fn clone_object(&mut self, object: &Object) -> Result<Object> {
        match object {
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.clone_dictionary(dict)?)),
            Object::Array(items) => {
                let mut new_items = Vec::with_capacity(items.len());
                for item in items {
                    new_items.push(self.clone_object(item)?);
                }
                Ok(Object::Array(new_items))
            }
            Object::Stream(stream) => {
                let mut new_stream = stream.clone();
                new_stream.dict = self.clone_dictionary(&stream.dict)?;
                Ok(Object::Stream(new_stream))
            }
            Object::Reference(ref_id) => {
                if let Some(existing) = self.copied.get(ref_id) {
                    return Ok(Object::Reference(*existing));
                }
                match self.source.get_object(*ref_id) {
                    Ok(referenced) => {
                        let new_id = self.reserve(*ref_id);
                        let cloned = self.clone_object(referenced)?;
                        self.target.objects.insert(new_id, cloned);
                        Ok(Object::Reference(new_id))
                    }
                    Err(err) => {
                        warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                        Ok(Object::Null)
                    }
                }
            }
            other => Ok(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_serialises() {
        let mut output = OutputDocument::new();
        assert_eq!(output.page_count(), 0);

        let bytes = output.to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert!(reloaded.get_pages().is_empty());
    }

    #[test]
    fn inherited_media_box_is_copied_onto_page() {
        let mut source = Document::with_version("1.5");
        let pages_id = source.new_object_id();
        let page_id = source.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        source.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 300.into()],
            }),
        );
        let catalog_id = source.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        source.trailer.set("Root", catalog_id);

        let page = source.get_object(page_id).unwrap().as_dict().unwrap().clone();
        let inherited = inherited_attributes(&source, &page);
        assert_eq!(inherited.len(), 1);
        assert_eq!(inherited[0].0, b"MediaBox".to_vec());
    }
}
