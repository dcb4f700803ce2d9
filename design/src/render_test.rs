#![allow(clippy::float_cmp)]

use super::*;
use crate::object::ObjectKind;
use crate::page::Page;

/// Records every call the bridge makes and hands out sequential handles.
#[derive(Default)]
struct Recorder {
    next: CanvasHandle,
    clears: usize,
    frame: Option<(f64, f64, String)>,
    mounted: Vec<ObjectId>,
}

impl RenderAdapter for Recorder {
    fn clear(&mut self) {
        self.clears += 1;
        self.mounted.clear();
    }

    fn set_page_frame(&mut self, width: f64, height: f64, background_color: &str) {
        self.frame = Some((width, height, background_color.to_owned()));
    }

    fn mount(&mut self, object: &Object) -> CanvasHandle {
        self.next += 1;
        self.mounted.push(object.id);
        self.next
    }
}

fn doc_with_text() -> (Document, PageId, ObjectId) {
    let mut doc = Document::with_page(Page::new("P", 400.0, 300.0, "#fafafa"));
    let page = doc.selected_page_id();
    let id = doc.add_object(&page, ObjectKind::text("Hi", 10.0, 10.0, 20.0)).unwrap();
    (doc, page, id)
}

fn moved_to(x: f64) -> PartialObject {
    PartialObject { x: Some(x), ..Default::default() }
}

// =============================================================
// sync
// =============================================================

#[test]
fn first_sync_paints_page() {
    let (doc, _, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();

    assert!(bridge.sync(&mut canvas, &doc));
    assert_eq!(canvas.clears, 1);
    assert_eq!(canvas.frame, Some((400.0, 300.0, "#fafafa".to_owned())));
    assert_eq!(canvas.mounted, vec![id]);
    assert_eq!(bridge.object_for(1), Some(id));
    assert_eq!(bridge.handle_for(&id), Some(1));
}

#[test]
fn unchanged_page_is_not_repainted() {
    let (doc, ..) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);
    assert!(!bridge.is_dirty(&doc));
    assert!(!bridge.sync(&mut canvas, &doc));
    assert_eq!(canvas.clears, 1);
}

#[test]
fn page_change_triggers_repaint() {
    let (mut doc, page, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);

    doc.duplicate_object(&page, &id).unwrap();
    assert!(bridge.is_dirty(&doc));
    assert!(bridge.sync(&mut canvas, &doc));
    assert_eq!(canvas.mounted.len(), 2);
}

#[test]
fn switching_pages_triggers_repaint() {
    let (mut doc, ..) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);

    doc.add_page();
    assert!(bridge.sync(&mut canvas, &doc));
    assert!(canvas.mounted.is_empty());
}

#[test]
fn invalidate_forces_repaint() {
    let (doc, ..) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);
    bridge.invalidate();
    assert!(bridge.sync(&mut canvas, &doc));
    assert_eq!(canvas.clears, 2);
}

#[test]
fn hidden_objects_are_not_mounted() {
    let (mut doc, page, id) = doc_with_text();
    doc.update_object(&page, &id, &PartialObject { visible: Some(false), ..Default::default() }).unwrap();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);
    assert!(canvas.mounted.is_empty());
    assert_eq!(bridge.handle_for(&id), None);
}

// =============================================================
// apply_event
// =============================================================

#[test]
fn gesture_updates_and_selects_target() {
    let (mut doc, page, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);

    let handle = bridge.handle_for(&id).unwrap();
    let event = CanvasEvent { target: Some(handle), changed: moved_to(120.0) };
    let actions = bridge.apply_event(&mut doc, &event).unwrap();

    assert_eq!(actions, vec![Action::SelectionChanged(Some(id)), Action::ObjectUpdated { id, fields: moved_to(120.0) }]);
    assert_eq!(doc.selected_objects(), [id]);
    assert_eq!(doc.page(&page).unwrap().get(&id).unwrap().geometry().unwrap().x, 120.0);
    assert!(bridge.is_dirty(&doc));
}

#[test]
fn click_on_already_selected_target_reports_nothing() {
    let (mut doc, _, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);
    doc.select_objects(&[id]).unwrap();

    let event = CanvasEvent { target: bridge.handle_for(&id), changed: PartialObject::default() };
    assert!(bridge.apply_event(&mut doc, &event).unwrap().is_empty());
}

#[test]
fn click_on_empty_canvas_clears_selection() {
    let (mut doc, _, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    doc.select_objects(&[id]).unwrap();

    let actions = bridge.apply_event(&mut doc, &CanvasEvent::default()).unwrap();
    assert_eq!(actions, vec![Action::SelectionChanged(None)]);
    assert!(doc.selected_objects().is_empty());

    assert!(bridge.apply_event(&mut doc, &CanvasEvent::default()).unwrap().is_empty());
}

#[test]
fn unmapped_handle_is_rejected() {
    let (mut doc, ..) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let before = doc.clone();
    let event = CanvasEvent { target: Some(99), changed: moved_to(1.0) };
    assert_eq!(bridge.apply_event(&mut doc, &event).unwrap_err(), EditorError::UnmappedHandle(99));
    assert_eq!(doc, before);
}

#[test]
fn locked_object_ignores_geometry() {
    let (mut doc, page, id) = doc_with_text();
    doc.update_object(&page, &id, &PartialObject { locked: Some(true), ..Default::default() }).unwrap();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);

    let event = CanvasEvent { target: bridge.handle_for(&id), changed: moved_to(300.0) };
    let actions = bridge.apply_event(&mut doc, &event).unwrap();
    assert_eq!(actions, vec![Action::SelectionChanged(Some(id))]);
    assert_eq!(doc.page(&page).unwrap().get(&id).unwrap().geometry().unwrap().x, 10.0);
}

#[test]
fn invalid_gesture_values_leave_document() {
    let (mut doc, _, id) = doc_with_text();
    let mut bridge = RenderBridge::new();
    let mut canvas = Recorder::default();
    bridge.sync(&mut canvas, &doc);
    let before = doc.clone();

    let event = CanvasEvent { target: bridge.handle_for(&id), changed: moved_to(f64::NAN) };
    assert!(matches!(bridge.apply_event(&mut doc, &event), Err(EditorError::InvalidValue { .. })));
    assert_eq!(doc, before);
}
