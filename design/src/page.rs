//! Page: an ordered stack of objects plus page-level dimensions and
//! background, and the object registry operations that mutate it.
//!
//! DESIGN
//! ======
//! Paint order is the sequence order: index 0 is painted first (bottom),
//! the last element is on top. Every operation that changes the page bumps a
//! monotonic revision counter; operations that turn out to be no-ops (moving
//! the first layer up, reordering an element onto itself) leave it alone so
//! the render bridge and the save tracker only see real changes.
//!
//! The revision is volatile: it is not serialized and is ignored by equality.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::consts::DUPLICATE_OFFSET;
use crate::error::EditorError;
use crate::object::{BackgroundFill, Object, ObjectId, ObjectKind, PartialObject};

/// Unique identifier for a page.
pub type PageId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    id: PageId,
    name: String,
    width: f64,
    height: f64,
    background_color: String,
    #[serde(default)]
    objects: Vec<Object>,
    #[serde(skip)]
    revision: u64,
}

impl PartialEq for Page {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.width == other.width
            && self.height == other.height
            && self.background_color == other.background_color
            && self.objects == other.objects
    }
}

impl Page {
    /// Create an empty page with a fresh id.
    #[must_use]
    pub fn new(name: &str, width: f64, height: f64, background_color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            width,
            height,
            background_color: background_color.to_owned(),
            objects: Vec::new(),
            revision: 0,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn id(&self) -> PageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// Objects in paint order, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Monotonic change counter, bumped by every successful mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == *id)
    }

    /// Paint-order index of an object.
    #[must_use]
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// The page's background object, if one has been set.
    #[must_use]
    pub fn background(&self) -> Option<&Object> {
        self.objects.iter().find(|o| o.is_background())
    }

    // --- Object registry ---

    /// Append a new object on top of the stack and return its id.
    pub fn add_object(&mut self, kind: ObjectKind) -> ObjectId {
        let mut object = Object::new(kind);
        object.normalize();
        let id = object.id;
        self.objects.push(object);
        self.touch();
        debug!(page = %self.id, object = %id, "object added");
        id
    }

    /// Merge `partial` into the object at `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `InvalidValue` for non-finite
    /// numbers; in both cases the page is unchanged.
    pub fn update_object(&mut self, id: &ObjectId, partial: &PartialObject) -> Result<(), EditorError> {
        let object = self.object_mut(id)?;
        if partial.is_empty() {
            return Ok(());
        }
        object.apply(partial)?;
        self.touch();
        Ok(())
    }

    /// Remove the object at `id` and return it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn delete_object(&mut self, id: &ObjectId) -> Result<Object, EditorError> {
        let index = self.require_index(id)?;
        let removed = self.objects.remove(index);
        self.touch();
        debug!(page = %self.id, object = %id, "object deleted");
        Ok(removed)
    }

    /// Deep-copy the object at `id`, offset the copy so it does not overlap
    /// exactly, and insert it directly above the source.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn duplicate_object(&mut self, id: &ObjectId) -> Result<ObjectId, EditorError> {
        let index = self.require_index(id)?;
        let mut copy = self.objects[index].duplicate();
        if let Some(g) = copy.geometry_mut() {
            g.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        }
        let new_id = copy.id;
        self.objects.insert(index + 1, copy);
        self.touch();
        debug!(page = %self.id, source = %id, object = %new_id, "object duplicated");
        Ok(new_id)
    }

    /// Swap the object with its neighbour toward index 0.
    ///
    /// Returns `Ok(false)` when the object is already first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn move_up(&mut self, id: &ObjectId) -> Result<bool, EditorError> {
        let index = self.require_index(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.objects.swap(index, index - 1);
        self.touch();
        Ok(true)
    }

    /// Swap the object with its neighbour toward the end of the sequence.
    ///
    /// Returns `Ok(false)` when the object is already last.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn move_down(&mut self, id: &ObjectId) -> Result<bool, EditorError> {
        let index = self.require_index(id)?;
        if index + 1 >= self.objects.len() {
            return Ok(false);
        }
        self.objects.swap(index, index + 1);
        self.touch();
        Ok(true)
    }

    /// Remove the element at `from` and reinsert it at `to`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if either index is past the end; the page is
    /// unchanged.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.objects.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::OutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let object = self.objects.remove(from);
        self.objects.insert(to, object);
        self.touch();
        Ok(())
    }

    /// Move the object to the top of the paint order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn bring_to_front(&mut self, id: &ObjectId) -> Result<bool, EditorError> {
        let index = self.require_index(id)?;
        let last = self.objects.len() - 1;
        if index == last {
            return Ok(false);
        }
        self.reorder(index, last)?;
        Ok(true)
    }

    /// Move the object to the bottom of the paint order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no object has this id.
    pub fn send_to_back(&mut self, id: &ObjectId) -> Result<bool, EditorError> {
        let index = self.require_index(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.reorder(index, 0)?;
        Ok(true)
    }

    /// Replace the fill of the existing background object, or insert a new
    /// background at the bottom of the stack. Returns the background's id.
    pub fn set_background(&mut self, fill: BackgroundFill) -> ObjectId {
        let existing = self.objects.iter_mut().find(|o| o.is_background());
        let id = if let Some(object) = existing {
            object.kind = ObjectKind::background(fill);
            object.id
        } else {
            let object = Object::new(ObjectKind::background(fill));
            let id = object.id;
            self.objects.insert(0, object);
            id
        };
        self.touch();
        id
    }

    // --- Page properties (driven by the page manager) ---

    pub(crate) fn rename(&mut self, name: &str) {
        name.clone_into(&mut self.name);
        self.touch();
    }

    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.touch();
    }

    pub(crate) fn set_background_color(&mut self, color: &str) {
        color.clone_into(&mut self.background_color);
        self.touch();
    }

    pub(crate) fn with_objects(mut self, objects: Vec<Object>) -> Self {
        self.objects = objects;
        self
    }

    /// Empty page with the same dimensions and background as `self`.
    pub(crate) fn blank_like(&self, name: &str) -> Self {
        Self::new(name, self.width, self.height, &self.background_color)
    }

    /// Deep copy with a new page id and fresh ids for every object.
    pub(crate) fn duplicate(&self, name: &str) -> Self {
        let mut copy = self.blank_like(name);
        copy.objects = self.objects.iter().map(Object::duplicate).collect();
        for (source, object) in self.objects.iter().zip(copy.objects.iter_mut()) {
            object.locked = source.locked;
        }
        copy
    }

    pub(crate) fn object_mut(&mut self, id: &ObjectId) -> Result<&mut Object, EditorError> {
        self.objects
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or(EditorError::NotFound(*id))
    }

    pub(crate) fn normalize_objects(&mut self) {
        for object in &mut self.objects {
            object.normalize();
        }
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    fn require_index(&self, id: &ObjectId) -> Result<usize, EditorError> {
        self.index_of(id).ok_or(EditorError::NotFound(*id))
    }
}
