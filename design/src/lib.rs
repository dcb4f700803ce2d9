//! Document model for the invitation design editor.
//!
//! This crate owns everything the editor knows about a design: the objects
//! placed on a page, the ordered pages of a document, the current selection,
//! the property editors that validate inspector input, and the JSON form the
//! persistence layer stores. Painting and hit-testing belong to an external
//! canvas library; [`render`] is the seam where its handles and gestures are
//! mapped back onto document ids.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Position, size, rotation and style primitives |
//! | [`object`] | Tagged object variants and sparse updates |
//! | [`page`] | Per-page object registry and paint order |
//! | [`document`] | Page manager, selection and the starter template |
//! | [`props`] | Inspector field edits with per-kind clamping |
//! | [`serial`] | Lossless JSON (de)serialization |
//! | [`render`] | Canvas-library adapter trait and handle mapping |
//! | [`error`] | Editor error taxonomy |
//! | [`consts`] | Shared defaults and clamp limits |

pub mod consts;
pub mod document;
pub mod error;
pub mod geometry;
pub mod object;
pub mod page;
pub mod props;
pub mod render;
pub mod serial;

pub use document::Document;
pub use error::EditorError;
pub use object::{Object, ObjectId, ObjectKind, PartialObject};
pub use page::{Page, PageId};
