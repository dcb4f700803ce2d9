//! Lossless JSON form of a document.
//!
//! DESIGN
//! ======
//! The blob is the serde form of [`Document`]: camelCase keys, objects tagged
//! by `kind`, pages and objects in order. Revision counters are volatile and
//! never written. Loading is all-or-nothing: any structural problem aborts
//! with `MalformedDocument` instead of producing a partly populated document.
//!
//! Selection is editor state rather than content, so a selection that is
//! absent or points at a missing page or object is repaired (and logged)
//! instead of rejected.

#[cfg(test)]
#[path = "serial_test.rs"]
mod serial_test;

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::EditorError;

/// Serialize a document to its persisted JSON blob.
///
/// # Errors
///
/// Returns `MalformedDocument` if serde cannot encode the document.
pub fn serialize(doc: &Document) -> Result<String, EditorError> {
    Ok(serde_json::to_string(doc)?)
}

/// Serialize a document to a JSON value for embedding in a request body.
///
/// # Errors
///
/// Returns `MalformedDocument` if serde cannot encode the document.
pub fn to_value(doc: &Document) -> Result<Value, EditorError> {
    Ok(serde_json::to_value(doc)?)
}

/// Rebuild a document from a persisted blob.
///
/// # Errors
///
/// Returns `MalformedDocument` when the blob is not JSON, an object lacks
/// `id` or `kind`, a `kind` is unknown, there are no pages, or a page or
/// object id appears twice.
pub fn deserialize(blob: &str) -> Result<Document, EditorError> {
    let value: Value = serde_json::from_str(blob)?;
    from_value(value)
}

/// Rebuild a document from an already-parsed JSON value.
///
/// # Errors
///
/// See [`deserialize`].
pub fn from_value(value: Value) -> Result<Document, EditorError> {
    let mut doc: Document = serde_json::from_value(value)?;
    validate(&doc)?;

    doc.normalize_objects();

    if doc.repair_selection() {
        warn!(page = %doc.selected_page_id(), "loaded document had a dangling selection; repaired");
    }
    debug!(pages = doc.page_count(), "document loaded");
    Ok(doc)
}

fn validate(doc: &Document) -> Result<(), EditorError> {
    if doc.pages().is_empty() {
        return Err(EditorError::MalformedDocument("document has no pages".to_owned()));
    }

    let mut page_ids = HashSet::new();
    let mut object_ids = HashSet::new();
    for page in doc.pages() {
        if !page_ids.insert(page.id()) {
            return Err(EditorError::MalformedDocument(format!("duplicate page id {}", page.id())));
        }
        if !(page.width().is_finite() && page.height().is_finite()) || page.width() <= 0.0 || page.height() <= 0.0 {
            return Err(EditorError::MalformedDocument(format!("page {} has invalid dimensions", page.id())));
        }
        for object in page.objects() {
            if !object_ids.insert(object.id) {
                return Err(EditorError::MalformedDocument(format!("duplicate object id {}", object.id)));
            }
            if !object.is_finite() {
                return Err(EditorError::MalformedDocument(format!("object {} has non-finite values", object.id)));
            }
        }
    }
    Ok(())
}
