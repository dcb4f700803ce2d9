//! Document: the ordered pages of a design plus the editor's selection.
//!
//! DESIGN
//! ======
//! The document is the unit of persistence and is owned by exactly one
//! editing session, so every operation is a plain `&mut self` method with no
//! interior locking. Page-manager operations live here; object-registry
//! operations are forwarded to the addressed [`Page`] so that selection can be
//! kept consistent (deleting an object drops it from the selection).
//!
//! Invariants:
//! - there is always at least one page;
//! - `selected_page` always names a page of this document;
//! - `selected_objects` only names objects on the selected page.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{
    DEFAULT_PAGE_BACKGROUND, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH, TEMPLATE_SUBTITLE, TEMPLATE_SUBTITLE_FONT_SIZE,
    TEMPLATE_TITLE, TEMPLATE_TITLE_FONT_SIZE,
};
use crate::error::EditorError;
use crate::object::{BackgroundFill, Object, ObjectId, ObjectKind, PartialObject, TextAlign};
use crate::page::{Page, PageId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pages: Vec<Page>,
    #[serde(default)]
    selected_page: PageId,
    #[serde(default)]
    selected_objects: Vec<ObjectId>,
    #[serde(skip)]
    revision: u64,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.pages == other.pages
            && self.selected_page == other.selected_page
            && self.selected_objects == other.selected_objects
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// New document with one default page holding the title/subtitle starter
    /// template.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page(starter_page())
    }

    /// New document whose only page is `page`.
    #[must_use]
    pub fn with_page(page: Page) -> Self {
        let selected_page = page.id();
        Self { pages: vec![page], selected_page, selected_objects: Vec::new(), revision: 0 }
    }

    // --- Queries ---

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == *id)
    }

    #[must_use]
    pub fn page_index(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == *id)
    }

    #[must_use]
    pub fn selected_page_id(&self) -> PageId {
        self.selected_page
    }

    /// The page currently shown in the editor.
    #[must_use]
    pub fn current_page(&self) -> &Page {
        let index = self.page_index(&self.selected_page).unwrap_or(0);
        &self.pages[index]
    }

    #[must_use]
    pub fn selected_objects(&self) -> &[ObjectId] {
        &self.selected_objects
    }

    /// Monotonic change counter covering every page and selection change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Locate an object anywhere in the document.
    #[must_use]
    pub fn find_object(&self, id: &ObjectId) -> Option<(PageId, &Object)> {
        self.pages
            .iter()
            .find_map(|p| p.get(id).map(|o| (p.id(), o)))
    }

    // --- Page manager ---

    /// Append a page with the dimensions and background of the last page and
    /// select it. A background object on the last page is copied as well.
    pub fn add_page(&mut self) -> PageId {
        let name = format!("Page {}", self.pages.len() + 1);
        let last = &self.pages[self.pages.len() - 1];
        let mut page = last.blank_like(&name);
        if let Some(background) = last.background() {
            page = page.with_objects(vec![background.duplicate()]);
        }
        let id = page.id();
        self.pages.push(page);
        self.selected_page = id;
        self.selected_objects.clear();
        self.bump();
        info!(page = %id, pages = self.pages.len(), "page added");
        id
    }

    /// Deep-copy a page, giving the copy and all of its objects fresh ids,
    /// and insert it right after the source.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn duplicate_page(&mut self, id: &PageId) -> Result<PageId, EditorError> {
        let index = self.require_page_index(id)?;
        let source = &self.pages[index];
        let copy = source.duplicate(&format!("{} (copy)", source.name()));
        let new_id = copy.id();
        self.pages.insert(index + 1, copy);
        self.bump();
        info!(source = %id, page = %new_id, "page duplicated");
        Ok(new_id)
    }

    /// Delete a page. If it was selected, the preceding page (or the new
    /// first page) becomes selected.
    ///
    /// # Errors
    ///
    /// Returns `LastPageError` if this is the only page and `NotFound` if the
    /// page does not exist; the document is unchanged in both cases.
    pub fn delete_page(&mut self, id: &PageId) -> Result<(), EditorError> {
        let index = self.require_page_index(id)?;
        if self.pages.len() == 1 {
            return Err(EditorError::LastPageError);
        }
        self.pages.remove(index);
        if self.selected_page == *id {
            let next = index.saturating_sub(1);
            self.selected_page = self.pages[next].id();
            self.selected_objects.clear();
        }
        self.bump();
        info!(page = %id, pages = self.pages.len(), "page deleted");
        Ok(())
    }

    /// Make `id` the current page and clear the object selection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn select_page(&mut self, id: &PageId) -> Result<(), EditorError> {
        self.require_page_index(id)?;
        if self.selected_page != *id || !self.selected_objects.is_empty() {
            self.selected_page = *id;
            self.selected_objects.clear();
            self.bump();
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn rename_page(&mut self, id: &PageId, name: &str) -> Result<(), EditorError> {
        self.page_mut(id)?.rename(name);
        self.bump();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` unless both dimensions are finite and positive,
    /// and `NotFound` if the page does not exist.
    pub fn resize_page(&mut self, id: &PageId, width: f64, height: f64) -> Result<(), EditorError> {
        for (field, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EditorError::invalid(field, value));
            }
        }
        self.page_mut(id)?.resize(width, height);
        self.bump();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn set_page_background_color(&mut self, id: &PageId, color: &str) -> Result<(), EditorError> {
        self.page_mut(id)?.set_background_color(color);
        self.bump();
        Ok(())
    }

    /// Move the page at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if either index is past the end.
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.pages.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::OutOfRange { index, len });
            }
        }
        if from != to {
            let page = self.pages.remove(from);
            self.pages.insert(to, page);
            self.bump();
        }
        Ok(())
    }

    // --- Selection ---

    /// Replace the object selection. Every id must be on the current page.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for the first id that is not on the current page;
    /// the selection is unchanged.
    pub fn select_objects(&mut self, ids: &[ObjectId]) -> Result<(), EditorError> {
        let page = self.current_page();
        if let Some(missing) = ids.iter().find(|id| !page.contains(id)) {
            return Err(EditorError::NotFound(*missing));
        }
        let mut selection: Vec<ObjectId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !selection.contains(id) {
                selection.push(*id);
            }
        }
        if selection != self.selected_objects {
            self.selected_objects = selection;
            self.bump();
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if !self.selected_objects.is_empty() {
            self.selected_objects.clear();
            self.bump();
        }
    }

    // --- Object registry (per page) ---

    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn add_object(&mut self, page: &PageId, kind: ObjectKind) -> Result<ObjectId, EditorError> {
        let id = self.page_mut(page)?.add_object(kind);
        self.bump();
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist and
    /// `InvalidValue` for non-finite numbers.
    pub fn update_object(&mut self, page: &PageId, id: &ObjectId, partial: &PartialObject) -> Result<(), EditorError> {
        self.page_mut(page)?.update_object(id, partial)?;
        self.bump_if(!partial.is_empty());
        Ok(())
    }

    /// Delete an object and drop it from the selection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn delete_object(&mut self, page: &PageId, id: &ObjectId) -> Result<Object, EditorError> {
        let removed = self.page_mut(page)?.delete_object(id)?;
        self.selected_objects.retain(|selected| selected != id);
        self.bump();
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn duplicate_object(&mut self, page: &PageId, id: &ObjectId) -> Result<ObjectId, EditorError> {
        let new_id = self.page_mut(page)?.duplicate_object(id)?;
        self.bump();
        Ok(new_id)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn move_up(&mut self, page: &PageId, id: &ObjectId) -> Result<bool, EditorError> {
        let moved = self.page_mut(page)?.move_up(id)?;
        self.bump_if(moved);
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn move_down(&mut self, page: &PageId, id: &ObjectId) -> Result<bool, EditorError> {
        let moved = self.page_mut(page)?.move_down(id)?;
        self.bump_if(moved);
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn bring_to_front(&mut self, page: &PageId, id: &ObjectId) -> Result<bool, EditorError> {
        let moved = self.page_mut(page)?.bring_to_front(id)?;
        self.bump_if(moved);
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page or object does not exist.
    pub fn send_to_back(&mut self, page: &PageId, id: &ObjectId) -> Result<bool, EditorError> {
        let moved = self.page_mut(page)?.send_to_back(id)?;
        self.bump_if(moved);
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist and `OutOfRange` for a
    /// bad index.
    pub fn reorder(&mut self, page: &PageId, from: usize, to: usize) -> Result<(), EditorError> {
        let target = self.page_mut(page)?;
        let before = target.revision();
        target.reorder(from, to)?;
        let changed = target.revision() != before;
        self.bump_if(changed);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the page does not exist.
    pub fn set_background(&mut self, page: &PageId, fill: BackgroundFill) -> Result<ObjectId, EditorError> {
        let id = self.page_mut(page)?.set_background(fill);
        self.bump();
        Ok(id)
    }

    // --- Internal ---

    pub(crate) fn page_mut(&mut self, id: &PageId) -> Result<&mut Page, EditorError> {
        self.pages
            .iter_mut()
            .find(|p| p.id() == *id)
            .ok_or(EditorError::NotFound(*id))
    }

    /// Repair a selection that points outside the document. Returns `true`
    /// if anything was changed.
    pub(crate) fn repair_selection(&mut self) -> bool {
        let mut repaired = false;
        let index = if let Some(index) = self.page_index(&self.selected_page) {
            index
        } else {
            self.selected_page = self.pages[0].id();
            repaired = true;
            0
        };
        let page = &self.pages[index];
        let before = self.selected_objects.len();
        self.selected_objects.retain(|id| page.contains(id));
        repaired || self.selected_objects.len() != before
    }

    /// Restore object invariants on every page without counting a revision.
    pub(crate) fn normalize_objects(&mut self) {
        for page in &mut self.pages {
            page.normalize_objects();
        }
    }

    pub(crate) fn bump(&mut self) {
        self.revision += 1;
    }

    fn bump_if(&mut self, changed: bool) {
        if changed {
            self.bump();
        }
    }

    fn require_page_index(&self, id: &PageId) -> Result<usize, EditorError> {
        self.page_index(id).ok_or(EditorError::NotFound(*id))
    }
}

/// Default page with the title/subtitle starter template; the subtitle sits
/// above the title in paint order.
fn starter_page() -> Page {
    let page = Page::new("Page 1", DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_BACKGROUND);
    page.with_objects(vec![
        template_text("Title", TEMPLATE_TITLE, 200.0, TEMPLATE_TITLE_FONT_SIZE),
        template_text("Subtitle", TEMPLATE_SUBTITLE, 280.0, TEMPLATE_SUBTITLE_FONT_SIZE),
    ])
}

fn template_text(name: &str, content: &str, y: f64, font_size: f64) -> Object {
    let mut object = Object::new(ObjectKind::text(content, 100.0, y, font_size));
    name.clone_into(&mut object.name);
    if let ObjectKind::Text(text) = &mut object.kind {
        text.text_align = TextAlign::Center;
        text.geometry.width = DEFAULT_PAGE_WIDTH - 200.0;
    }
    object
}
