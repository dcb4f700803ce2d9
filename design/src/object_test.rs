#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn rect() -> Object {
    Object::new(ObjectKind::shape(ShapeKind::Rectangle, Geometry::new(10.0, 10.0, 100.0, 50.0), Style::filled("#ff0000")))
}

fn circle() -> Object {
    Object::new(ObjectKind::shape(ShapeKind::Circle, Geometry::new(0.0, 0.0, 40.0, 40.0), Style::default()))
}

fn text(content: &str) -> Object {
    Object::new(ObjectKind::text(content, 5.0, 5.0, 24.0))
}

fn shape_of(object: &Object) -> &ShapeObject {
    match &object.kind {
        ObjectKind::Shape(s) => s,
        other => panic!("expected shape, got {}", other.tag()),
    }
}

fn text_of(object: &Object) -> &TextObject {
    match &object.kind {
        ObjectKind::Text(t) => t,
        other => panic!("expected text, got {}", other.tag()),
    }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_object_gets_fresh_id_and_default_name() {
    let a = rect();
    let b = rect();
    assert_ne!(a.id, b.id);
    assert_eq!(a.name, "Rectangle");
    assert!(a.visible);
    assert!(!a.locked);
}

#[test]
fn text_default_name_uses_content() {
    assert_eq!(text("Hello").name, "Hello");
    assert_eq!(text("   ").name, "Text");
}

#[test]
fn text_default_name_is_truncated() {
    let long = "abcdefghijklmnopqrstuvwxyz0123";
    assert_eq!(text(long).name.chars().count(), 24);
}

#[test]
fn text_constructor_sizes_box_to_font() {
    let t = text("x");
    let g = t.geometry().unwrap();
    assert_eq!(g.height, 24.0);
    assert_eq!(text_of(&t).font_family, "Arial");
}

#[test]
fn polygon_label_and_tag() {
    let poly = ObjectKind::shape(ShapeKind::Polygon("star-5".into()), Geometry::new(0.0, 0.0, 1.0, 1.0), Style::default());
    assert_eq!(poly.tag(), "shape");
    assert_eq!(poly.default_name(), "Polygon");
}

#[test]
fn background_has_no_geometry_or_style() {
    let bg = Object::new(ObjectKind::background(BackgroundFill::Solid { color: "#fff".into() }));
    assert!(bg.is_background());
    assert!(bg.geometry().is_none());
    assert!(bg.style().is_none());
    assert_eq!(bg.opacity(), 1.0);
}

// =============================================================
// duplicate
// =============================================================

#[test]
fn duplicate_copies_everything_but_id_and_lock() {
    let mut source = rect();
    source.locked = true;
    source.name = "Card".into();
    let copy = source.duplicate();
    assert_ne!(copy.id, source.id);
    assert!(!copy.locked);
    assert_eq!(copy.name, "Card");
    assert_eq!(copy.kind, source.kind);
}

// =============================================================
// apply
// =============================================================

#[test]
fn apply_merges_only_present_fields() {
    let mut r = rect();
    let partial = PartialObject { x: Some(50.0), fill_color: Some("#00ff00".into()), ..Default::default() };
    r.apply(&partial).unwrap();
    let g = r.geometry().unwrap();
    assert_eq!(g.x, 50.0);
    assert_eq!(g.y, 10.0);
    assert_eq!(r.style().unwrap().fill_color, "#00ff00");
}

#[test]
fn apply_rejects_non_finite_without_writing() {
    let mut r = rect();
    let before = r.clone();
    let partial = PartialObject { x: Some(99.0), width: Some(f64::NAN), ..Default::default() };
    let err = r.apply(&partial).unwrap_err();
    assert!(matches!(err, EditorError::InvalidValue { ref field, .. } if field == "width"));
    assert_eq!(r, before);
}

#[test]
fn apply_rejects_infinite_opacity() {
    let mut r = rect();
    let partial = PartialObject { opacity: Some(f64::INFINITY), ..Default::default() };
    assert!(r.apply(&partial).is_err());
}

#[test]
fn apply_normalizes_afterwards() {
    let mut r = rect();
    let partial = PartialObject {
        width: Some(-5.0),
        rotation: Some(370.0),
        opacity: Some(3.0),
        stroke_width: Some(-1.0),
        ..Default::default()
    };
    r.apply(&partial).unwrap();
    let g = r.geometry().unwrap();
    assert_eq!(g.width, 0.0);
    assert_eq!(g.rotation, 10.0);
    assert_eq!(r.opacity(), 1.0);
    assert_eq!(r.style().unwrap().stroke_width, 0.0);
}

#[test]
fn corner_radius_applies_to_rectangles_only() {
    let mut r = rect();
    let mut c = circle();
    let partial = PartialObject { corner_radius: Some(8.0), ..Default::default() };
    r.apply(&partial).unwrap();
    c.apply(&partial).unwrap();
    assert_eq!(shape_of(&r).corner_radius, 8.0);
    assert_eq!(shape_of(&c).corner_radius, 0.0);
}

#[test]
fn text_fields_ignored_on_shapes() {
    let mut r = rect();
    let before = r.clone();
    let partial = PartialObject { content: Some("hi".into()), font_size: Some(30.0), ..Default::default() };
    r.apply(&partial).unwrap();
    assert_eq!(r, before);
}

#[test]
fn apply_updates_text_fields() {
    let mut t = text("a");
    let partial = PartialObject {
        content: Some("b".into()),
        font_weight: Some(FontWeight::Bold),
        italic: Some(true),
        text_align: Some(TextAlign::Right),
        ..Default::default()
    };
    t.apply(&partial).unwrap();
    let body = text_of(&t);
    assert_eq!(body.content, "b");
    assert_eq!(body.font_weight, FontWeight::Bold);
    assert!(body.italic);
    assert_eq!(body.text_align, TextAlign::Right);
}

#[test]
fn image_opacity_lives_on_the_image() {
    let mut img = Object::new(ObjectKind::image("https://cdn/x.png", Geometry::new(0.0, 0.0, 10.0, 10.0)));
    img.apply(&PartialObject { opacity: Some(0.25), ..Default::default() }).unwrap();
    assert_eq!(img.opacity(), 0.25);
    assert!(img.style().is_none());
}

#[test]
fn background_fill_replaced_and_stops_clamped() {
    let mut bg = Object::new(ObjectKind::background(BackgroundFill::Solid { color: "#fff".into() }));
    let gradient = BackgroundFill::Gradient(Gradient {
        kind: GradientKind::Linear,
        angle: 90.0,
        stops: vec![
            ColorStop { offset: -0.5, color: "#000".into() },
            ColorStop { offset: 1.5, color: "#fff".into() },
        ],
    });
    bg.apply(&PartialObject { fill: Some(gradient), x: Some(10.0), ..Default::default() }).unwrap();
    let ObjectKind::Background(body) = &bg.kind else { panic!("expected background") };
    let BackgroundFill::Gradient(g) = &body.fill else { panic!("expected gradient") };
    assert_eq!(g.stops[0].offset, 0.0);
    assert_eq!(g.stops[1].offset, 1.0);
}

#[test]
fn normalize_fixes_non_positive_font_size() {
    let mut t = text("a");
    if let ObjectKind::Text(body) = &mut t.kind {
        body.font_size = 0.0;
    }
    t.normalize();
    assert_eq!(text_of(&t).font_size, FONT_SIZE_MIN);
}

// =============================================================
// PartialObject
// =============================================================

#[test]
fn empty_partial() {
    assert!(PartialObject::default().is_empty());
    assert!(!PartialObject { name: Some(String::new()), ..Default::default() }.is_empty());
}

#[test]
fn without_geometry_keeps_other_fields() {
    let partial = PartialObject { x: Some(1.0), scale_y: Some(2.0), fill_color: Some("#111111".into()), ..Default::default() };
    assert!(partial.has_geometry());
    let stripped = partial.without_geometry();
    assert!(!stripped.has_geometry());
    assert_eq!(stripped.fill_color.as_deref(), Some("#111111"));
}

#[test]
fn partial_serializes_sparsely() {
    let partial = PartialObject { font_size: Some(12.0), ..Default::default() };
    assert_eq!(serde_json::to_value(&partial).unwrap(), json!({ "fontSize": 12.0 }));
}

// =============================================================
// Wire form
// =============================================================

#[test]
fn object_wire_form_is_flat_and_tagged() {
    let r = rect();
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(value["kind"], "shape");
    assert_eq!(value["shape"], "rectangle");
    assert_eq!(value["style"]["fillColor"], "#ff0000");
    assert_eq!(value["id"], json!(r.id));
}

#[test]
fn object_round_trips_through_json() {
    let t = text("Save the date");
    let back: Object = serde_json::from_value(serde_json::to_value(&t).unwrap()).unwrap();
    assert_eq!(back, t);
}

#[test]
fn object_metadata_defaults_when_absent() {
    let value = json!({
        "id": Uuid::new_v4(),
        "kind": "image",
        "src": "a.png",
        "geometry": { "x": 0, "y": 0, "width": 10, "height": 10 }
    });
    let img: Object = serde_json::from_value(value).unwrap();
    assert!(img.visible);
    assert!(!img.locked);
    assert_eq!(img.name, "");
    assert_eq!(img.opacity(), 1.0);
}

#[test]
fn object_without_kind_fails() {
    let value = json!({ "id": Uuid::new_v4(), "src": "a.png" });
    assert!(serde_json::from_value::<Object>(value).is_err());
}

#[test]
fn object_with_unknown_kind_fails() {
    let value = json!({ "id": Uuid::new_v4(), "kind": "video" });
    assert!(serde_json::from_value::<Object>(value).is_err());
}
