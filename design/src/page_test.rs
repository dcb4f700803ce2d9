#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::{Geometry, Style};
use crate::object::ShapeKind;

fn blank() -> Page {
    Page::new("Page 1", 800.0, 600.0, "#ffffff")
}

fn box_at(x: f64) -> ObjectKind {
    ObjectKind::shape(ShapeKind::Rectangle, Geometry::new(x, 0.0, 10.0, 10.0), Style::default())
}

/// Page with three rectangles; returns their ids bottom first.
fn three() -> (Page, [ObjectId; 3]) {
    let mut page = blank();
    let a = page.add_object(box_at(0.0));
    let b = page.add_object(box_at(1.0));
    let c = page.add_object(box_at(2.0));
    (page, [a, b, c])
}

fn order(page: &Page) -> Vec<ObjectId> {
    page.objects().iter().map(|o| o.id).collect()
}

// =============================================================
// add / update / delete
// =============================================================

#[test]
fn add_object_appends_on_top() {
    let (page, [a, b, c]) = three();
    assert_eq!(order(&page), vec![a, b, c]);
    assert_eq!(page.revision(), 3);
}

#[test]
fn update_object_merges() {
    let (mut page, [a, ..]) = three();
    page.update_object(&a, &PartialObject { y: Some(42.0), ..Default::default() }).unwrap();
    assert_eq!(page.get(&a).unwrap().geometry().unwrap().y, 42.0);
}

#[test]
fn update_unknown_object_is_not_found() {
    let (mut page, _) = three();
    let ghost = Uuid::new_v4();
    let err = page.update_object(&ghost, &PartialObject::default()).unwrap_err();
    assert_eq!(err, EditorError::NotFound(ghost));
}

#[test]
fn empty_update_leaves_revision() {
    let (mut page, [a, ..]) = three();
    let rev = page.revision();
    page.update_object(&a, &PartialObject::default()).unwrap();
    assert_eq!(page.revision(), rev);
}

#[test]
fn failed_update_leaves_revision() {
    let (mut page, [a, ..]) = three();
    let rev = page.revision();
    assert!(page.update_object(&a, &PartialObject { x: Some(f64::NAN), ..Default::default() }).is_err());
    assert_eq!(page.revision(), rev);
}

#[test]
fn delete_then_delete_again_is_not_found() {
    let (mut page, [a, b, c]) = three();
    let removed = page.delete_object(&b).unwrap();
    assert_eq!(removed.id, b);
    assert_eq!(order(&page), vec![a, c]);
    assert_eq!(page.delete_object(&b).unwrap_err(), EditorError::NotFound(b));
    assert_eq!(order(&page), vec![a, c]);
}

// =============================================================
// duplicate
// =============================================================

#[test]
fn duplicate_inserts_offset_copy_above_source() {
    let (mut page, [a, b, c]) = three();
    let copy = page.duplicate_object(&a).unwrap();
    assert_eq!(order(&page), vec![a, copy, b, c]);

    let src = page.get(&a).unwrap().geometry().unwrap();
    let dup = page.get(&copy).unwrap().geometry().unwrap();
    assert_eq!(dup.x, src.x + DUPLICATE_OFFSET);
    assert_eq!(dup.y, src.y + DUPLICATE_OFFSET);
    assert_eq!(dup.width, src.width);
}

#[test]
fn duplicate_background_is_not_offset() {
    let mut page = blank();
    let bg = page.set_background(BackgroundFill::Solid { color: "#eee".into() });
    let copy = page.duplicate_object(&bg).unwrap();
    assert_ne!(copy, bg);
    assert_eq!(page.index_of(&copy), Some(1));
}

#[test]
fn duplicate_unknown_is_not_found() {
    let (mut page, _) = three();
    assert!(matches!(page.duplicate_object(&Uuid::new_v4()), Err(EditorError::NotFound(_))));
}

// =============================================================
// move_up / move_down
// =============================================================

#[test]
fn move_up_swaps_toward_start() {
    let (mut page, [a, b, c]) = three();
    assert!(page.move_up(&c).unwrap());
    assert_eq!(order(&page), vec![a, c, b]);
}

#[test]
fn move_up_at_first_is_noop() {
    let (mut page, [a, b, c]) = three();
    let rev = page.revision();
    assert!(!page.move_up(&a).unwrap());
    assert_eq!(order(&page), vec![a, b, c]);
    assert_eq!(page.revision(), rev);
}

#[test]
fn move_down_swaps_toward_end() {
    let (mut page, [a, b, c]) = three();
    assert!(page.move_down(&a).unwrap());
    assert_eq!(order(&page), vec![b, a, c]);
}

#[test]
fn move_down_at_last_is_noop() {
    let (mut page, [a, b, c]) = three();
    assert!(!page.move_down(&c).unwrap());
    assert_eq!(order(&page), vec![a, b, c]);
}

// =============================================================
// reorder
// =============================================================

#[test]
fn reorder_moves_first_to_last() {
    let (mut page, [a, b, c]) = three();
    page.reorder(0, 2).unwrap();
    assert_eq!(order(&page), vec![b, c, a]);
}

#[test]
fn reorder_moves_last_to_first() {
    let (mut page, [a, b, c]) = three();
    page.reorder(2, 0).unwrap();
    assert_eq!(order(&page), vec![c, a, b]);
}

#[test]
fn reorder_out_of_range() {
    let (mut page, [a, b, c]) = three();
    assert_eq!(page.reorder(0, 3).unwrap_err(), EditorError::OutOfRange { index: 3, len: 3 });
    assert_eq!(page.reorder(7, 0).unwrap_err(), EditorError::OutOfRange { index: 7, len: 3 });
    assert_eq!(order(&page), vec![a, b, c]);
}

#[test]
fn reorder_onto_itself_keeps_revision() {
    let (mut page, _) = three();
    let rev = page.revision();
    page.reorder(1, 1).unwrap();
    assert_eq!(page.revision(), rev);
}

#[test]
fn reorder_on_empty_page_is_out_of_range() {
    let mut page = blank();
    assert_eq!(page.reorder(0, 0).unwrap_err(), EditorError::OutOfRange { index: 0, len: 0 });
}

// =============================================================
// front / back
// =============================================================

#[test]
fn bring_to_front_and_send_to_back() {
    let (mut page, [a, b, c]) = three();
    assert!(page.bring_to_front(&a).unwrap());
    assert_eq!(order(&page), vec![b, c, a]);
    assert!(!page.bring_to_front(&a).unwrap());

    assert!(page.send_to_back(&a).unwrap());
    assert_eq!(order(&page), vec![a, b, c]);
    assert!(!page.send_to_back(&a).unwrap());
}

// =============================================================
// background
// =============================================================

#[test]
fn set_background_inserts_at_bottom_once() {
    let (mut page, [a, ..]) = three();
    let bg = page.set_background(BackgroundFill::Solid { color: "#111".into() });
    assert_eq!(page.index_of(&bg), Some(0));
    assert_eq!(page.index_of(&a), Some(1));

    let again = page.set_background(BackgroundFill::Pattern { id: "dots".into() });
    assert_eq!(again, bg);
    assert_eq!(page.len(), 4);
    let ObjectKind::Background(body) = &page.background().unwrap().kind else { panic!("expected background") };
    assert_eq!(body.fill, BackgroundFill::Pattern { id: "dots".into() });
}

// =============================================================
// page copies
// =============================================================

#[test]
fn blank_like_copies_dimensions_only() {
    let (page, _) = three();
    let copy = page.blank_like("Page 2");
    assert_ne!(copy.id(), page.id());
    assert_eq!((copy.width(), copy.height()), (800.0, 600.0));
    assert_eq!(copy.background_color(), "#ffffff");
    assert!(copy.is_empty());
}

#[test]
fn duplicate_page_gives_fresh_ids_and_keeps_locks() {
    let (mut page, [a, ..]) = three();
    page.update_object(&a, &PartialObject { locked: Some(true), ..Default::default() }).unwrap();
    let copy = page.duplicate("copy");
    assert_eq!(copy.len(), 3);
    for (src, dup) in page.objects().iter().zip(copy.objects()) {
        assert_ne!(src.id, dup.id);
        assert_eq!(src.kind, dup.kind);
        assert_eq!(src.locked, dup.locked);
    }
}

#[test]
fn equality_ignores_revision() {
    let (page, _) = three();
    let mut other = page.clone();
    other.touch();
    assert_eq!(page, other);
}

#[test]
fn revision_is_not_serialized() {
    let (page, _) = three();
    let value = serde_json::to_value(&page).unwrap();
    assert!(value.get("revision").is_none());
    assert_eq!(value["backgroundColor"], "#ffffff");
}
