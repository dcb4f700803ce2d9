#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// normalize_rotation
// =============================================================

#[test]
fn rotation_within_range_is_unchanged() {
    assert_eq!(normalize_rotation(0.0), 0.0);
    assert_eq!(normalize_rotation(45.0), 45.0);
    assert_eq!(normalize_rotation(359.5), 359.5);
}

#[test]
fn rotation_wraps_full_turns() {
    assert_eq!(normalize_rotation(360.0), 0.0);
    assert_eq!(normalize_rotation(725.0), 5.0);
}

#[test]
fn rotation_wraps_negative_angles() {
    assert_eq!(normalize_rotation(-90.0), 270.0);
    assert_eq!(normalize_rotation(-360.0), 0.0);
}

#[test]
fn rotation_tiny_negative_never_yields_360() {
    let r = normalize_rotation(-1e-20);
    assert!((0.0..360.0).contains(&r));
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn new_geometry_has_unit_scale_and_no_rotation() {
    let g = Geometry::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(g.rotation, 0.0);
    assert_eq!(g.scale_x, 1.0);
    assert_eq!(g.scale_y, 1.0);
}

#[test]
fn normalize_clamps_negative_size() {
    let mut g = Geometry::new(0.0, 0.0, -10.0, -1.0);
    g.normalize();
    assert_eq!(g.width, 0.0);
    assert_eq!(g.height, 0.0);
}

#[test]
fn normalize_wraps_rotation() {
    let mut g = Geometry::new(0.0, 0.0, 10.0, 10.0);
    g.rotation = -30.0;
    g.normalize();
    assert_eq!(g.rotation, 330.0);
}

#[test]
fn translate_moves_origin_only() {
    let mut g = Geometry::new(5.0, 5.0, 10.0, 20.0);
    g.translate(20.0, -5.0);
    assert_eq!((g.x, g.y, g.width, g.height), (25.0, 0.0, 10.0, 20.0));
}

#[test]
fn scaled_size_uses_absolute_scale() {
    let mut g = Geometry::new(0.0, 0.0, 10.0, 20.0);
    g.scale_x = -2.0;
    g.scale_y = 0.5;
    assert_eq!(g.scaled_width(), 20.0);
    assert_eq!(g.scaled_height(), 10.0);
}

#[test]
fn geometry_deserializes_with_default_transform() {
    let g: Geometry = serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
    assert_eq!(g, Geometry::new(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn geometry_serializes_camel_case() {
    let json = serde_json::to_string(&Geometry::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert!(json.contains("\"scaleX\""));
    assert!(!json.contains("scale_x"));
}

// =============================================================
// Style
// =============================================================

#[test]
fn default_style_is_opaque_without_stroke() {
    let s = Style::default();
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.stroke_width, 0.0);
}

#[test]
fn style_normalize_clamps_opacity_and_stroke() {
    let mut s = Style { opacity: 1.5, stroke_width: -3.0, ..Style::default() };
    s.normalize();
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.stroke_width, 0.0);

    s.opacity = -0.2;
    s.normalize();
    assert_eq!(s.opacity, 0.0);
}

#[test]
fn filled_style_sets_fill_only() {
    let s = Style::filled("#ff0000");
    assert_eq!(s.fill_color, "#ff0000");
    assert_eq!(s.stroke_color, Style::default().stroke_color);
}
