//! Bridge between the document and the external canvas library.
//!
//! The canvas library paints objects and reports gestures, but it has its own
//! object identity. [`RenderBridge`] keeps the explicit handle ↔ id mapping,
//! repaints only when the current page changed since the last paint, and
//! turns gesture events back into document mutations.
//!
//! Data flows out through [`RenderAdapter`] (clear, frame, mount) and back in
//! through [`RenderBridge::apply_event`], which returns [`Action`]s for the
//! host to react to (refresh the inspector, mark the design unsaved, ...).

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use tracing::debug;

use crate::document::Document;
use crate::error::EditorError;
use crate::object::{Object, ObjectId, PartialObject};
use crate::page::PageId;

/// The canvas library's own identifier for a painted object.
pub type CanvasHandle = u64;

/// Painting surface provided by the canvas library.
pub trait RenderAdapter {
    /// Remove every painted object.
    fn clear(&mut self);

    /// Size the drawing surface and paint the page background color.
    fn set_page_frame(&mut self, width: f64, height: f64, background_color: &str);

    /// Paint one object on top of everything painted so far and return the
    /// library's handle for it.
    fn mount(&mut self, object: &Object) -> CanvasHandle;
}

/// Selection/modification event reported by the canvas library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasEvent {
    /// Object under the gesture, or `None` when the user clicked empty canvas.
    pub target: Option<CanvasHandle>,
    /// Fields the gesture changed on the target (move, scale, rotate).
    pub changed: PartialObject,
}

/// Effects of an applied canvas event, for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged(Option<ObjectId>),
    ObjectUpdated { id: ObjectId, fields: PartialObject },
}

/// Keeps the canvas library in step with the current page.
#[derive(Debug, Default)]
pub struct RenderBridge {
    handles: HashMap<CanvasHandle, ObjectId>,
    objects: HashMap<ObjectId, CanvasHandle>,
    painted: Option<(PageId, u64)>,
}

impl RenderBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Object id behind a canvas handle from the last paint.
    #[must_use]
    pub fn object_for(&self, handle: CanvasHandle) -> Option<ObjectId> {
        self.handles.get(&handle).copied()
    }

    /// Canvas handle of an object from the last paint.
    #[must_use]
    pub fn handle_for(&self, id: &ObjectId) -> Option<CanvasHandle> {
        self.objects.get(id).copied()
    }

    /// Returns `true` if `doc`'s current page differs from what was last painted.
    #[must_use]
    pub fn is_dirty(&self, doc: &Document) -> bool {
        let page = doc.current_page();
        self.painted != Some((page.id(), page.revision()))
    }

    /// Force the next [`sync`](Self::sync) to repaint.
    pub fn invalidate(&mut self) {
        self.painted = None;
    }

    /// Repaint the current page if it changed since the last paint. Hidden
    /// objects are not mounted. Returns `true` if a repaint happened.
    pub fn sync(&mut self, adapter: &mut impl RenderAdapter, doc: &Document) -> bool {
        if !self.is_dirty(doc) {
            return false;
        }
        let page = doc.current_page();
        adapter.clear();
        self.handles.clear();
        self.objects.clear();
        adapter.set_page_frame(page.width(), page.height(), page.background_color());
        for object in page.objects().iter().filter(|o| o.visible) {
            let handle = adapter.mount(object);
            self.handles.insert(handle, object.id);
            self.objects.insert(object.id, handle);
        }
        self.painted = Some((page.id(), page.revision()));
        debug!(page = %page.id(), revision = page.revision(), mounted = self.handles.len(), "page painted");
        true
    }

    /// Apply a canvas event to the document.
    ///
    /// A `None` target clears the selection. A mapped target becomes the sole
    /// selection and receives the changed fields; geometry changes are
    /// dropped for locked objects.
    ///
    /// # Errors
    ///
    /// Returns `UnmappedHandle` for a handle not mounted by the last paint, or
    /// any error from the underlying object update; the document is
    /// unchanged on error.
    pub fn apply_event(&mut self, doc: &mut Document, event: &CanvasEvent) -> Result<Vec<Action>, EditorError> {
        let mut actions = Vec::new();

        let Some(handle) = event.target else {
            if !doc.selected_objects().is_empty() {
                doc.clear_selection();
                actions.push(Action::SelectionChanged(None));
            }
            return Ok(actions);
        };

        let id = self.object_for(handle).ok_or(EditorError::UnmappedHandle(handle))?;
        let page_id = match self.painted {
            Some((page_id, _)) => page_id,
            None => doc.selected_page_id(),
        };
        let locked = doc
            .page(&page_id)
            .and_then(|p| p.get(&id))
            .ok_or(EditorError::NotFound(id))?
            .locked;

        let fields = if locked { event.changed.without_geometry() } else { event.changed.clone() };
        if !fields.is_empty() {
            doc.update_object(&page_id, &id, &fields)?;
        }

        if doc.selected_objects() != [id] {
            doc.select_page(&page_id)?;
            doc.select_objects(&[id])?;
            actions.push(Action::SelectionChanged(Some(id)));
        }
        if !fields.is_empty() {
            actions.push(Action::ObjectUpdated { id, fields });
        }
        Ok(actions)
    }
}
