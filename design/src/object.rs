//! Placed objects: the tagged object variants, their per-kind fields, and a
//! sparse-update type for incremental edits (`PartialObject`).
//!
//! Data flows into this layer from three directions: the persistence layer
//! (JSON deserialization), the property editors, and canvas gestures reported
//! by the render adapter. All three funnel through [`Object::apply`], which
//! validates numbers and re-establishes the geometry/style invariants.

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_FAMILY, FONT_SIZE_MIN};
use crate::error::EditorError;
use crate::geometry::{Geometry, Style, clamp_opacity};

/// Unique identifier for a placed object.
pub type ObjectId = Uuid;

/// A single visual element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// Stable identifier; survives moves and reorders, never reused.
    pub id: ObjectId,
    /// Label shown in the layers panel.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked objects ignore geometry changes coming from canvas gestures.
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

fn default_true() -> bool {
    true
}

/// Per-kind payload of an object, discriminated by the `kind` tag on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextObject),
    Shape(ShapeObject),
    Image(ImageObject),
    /// Full-page fill; has no geometry of its own.
    Background(BackgroundObject),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    pub content: String,
    pub font_family: String,
    /// Point size; always greater than zero.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub text_align: TextAlign,
    pub style: Style,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeObject {
    pub shape: ShapeKind,
    /// Rounded-corner radius; only meaningful for rectangles.
    #[serde(default)]
    pub corner_radius: f64,
    pub style: Style,
    pub geometry: Geometry,
}

/// Geometric primitive drawn by a shape object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Ellipse,
    Line,
    /// Polygon taken from the shape library, identified by its preset id.
    Polygon(String),
}

impl ShapeKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Ellipse => "Ellipse",
            Self::Line => "Line",
            Self::Polygon(_) => "Polygon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    /// Source URI of the image.
    pub src: String,
    pub geometry: Geometry,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
}

fn full_opacity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundObject {
    pub fill: BackgroundFill,
}

/// How a background object covers its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundFill {
    Solid { color: String },
    Gradient(Gradient),
    /// Repeating pattern from the pattern library.
    Pattern { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub kind: GradientKind,
    /// Direction of a linear gradient in degrees; ignored for radial.
    #[serde(default)]
    pub angle: f64,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    pub color: String,
}

impl ObjectKind {
    /// Text object with the default font at `(x, y)`.
    #[must_use]
    pub fn text(content: &str, x: f64, y: f64, font_size: f64) -> Self {
        Self::Text(TextObject {
            content: content.to_owned(),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size,
            font_weight: FontWeight::Normal,
            italic: false,
            text_align: TextAlign::Left,
            style: Style::filled(DEFAULT_COLOR),
            geometry: Geometry::new(x, y, 0.0, font_size),
        })
    }

    #[must_use]
    pub fn shape(shape: ShapeKind, geometry: Geometry, style: Style) -> Self {
        Self::Shape(ShapeObject { shape, corner_radius: 0.0, style, geometry })
    }

    #[must_use]
    pub fn image(src: &str, geometry: Geometry) -> Self {
        Self::Image(ImageObject { src: src.to_owned(), geometry, opacity: 1.0 })
    }

    #[must_use]
    pub fn background(fill: BackgroundFill) -> Self {
        Self::Background(BackgroundObject { fill })
    }

    /// Wire tag of this kind (`"text"`, `"shape"`, ...).
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
            Self::Image(_) => "image",
            Self::Background(_) => "background",
        }
    }

    /// Layer-panel label given to new objects of this kind.
    #[must_use]
    pub fn default_name(&self) -> String {
        match self {
            Self::Text(t) => {
                let content = t.content.trim();
                if content.is_empty() {
                    "Text".to_owned()
                } else {
                    content.chars().take(24).collect()
                }
            }
            Self::Shape(s) => s.shape.label().to_owned(),
            Self::Image(_) => "Image".to_owned(),
            Self::Background(_) => "Background".to_owned(),
        }
    }
}

impl Object {
    /// Wrap a kind payload with a freshly generated id and default metadata.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self { id: Uuid::new_v4(), name: kind.default_name(), visible: true, locked: false, kind }
    }

    /// Deep copy with a new id. The copy is never locked.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self { id: Uuid::new_v4(), locked: false, ..self.clone() }
    }

    #[must_use]
    pub fn is_background(&self) -> bool {
        matches!(self.kind, ObjectKind::Background(_))
    }

    /// Geometry of the object; `None` for backgrounds, which cover the page.
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            ObjectKind::Text(t) => Some(&t.geometry),
            ObjectKind::Shape(s) => Some(&s.geometry),
            ObjectKind::Image(i) => Some(&i.geometry),
            ObjectKind::Background(_) => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            ObjectKind::Text(t) => Some(&mut t.geometry),
            ObjectKind::Shape(s) => Some(&mut s.geometry),
            ObjectKind::Image(i) => Some(&mut i.geometry),
            ObjectKind::Background(_) => None,
        }
    }

    /// Fill/stroke style; only text and shape objects carry one.
    #[must_use]
    pub fn style(&self) -> Option<&Style> {
        match &self.kind {
            ObjectKind::Text(t) => Some(&t.style),
            ObjectKind::Shape(s) => Some(&s.style),
            ObjectKind::Image(_) | ObjectKind::Background(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut Style> {
        match &mut self.kind {
            ObjectKind::Text(t) => Some(&mut t.style),
            ObjectKind::Shape(s) => Some(&mut s.style),
            ObjectKind::Image(_) | ObjectKind::Background(_) => None,
        }
    }

    /// Effective opacity regardless of where the kind stores it.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        match &self.kind {
            ObjectKind::Text(t) => t.style.opacity,
            ObjectKind::Shape(s) => s.style.opacity,
            ObjectKind::Image(i) => i.opacity,
            ObjectKind::Background(_) => 1.0,
        }
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> bool {
        let opacity = clamp_opacity(opacity);
        match &mut self.kind {
            ObjectKind::Text(t) => t.style.opacity = opacity,
            ObjectKind::Shape(s) => s.style.opacity = opacity,
            ObjectKind::Image(i) => i.opacity = opacity,
            ObjectKind::Background(_) => return false,
        }
        true
    }

    /// Merge a sparse update into this object.
    ///
    /// The id and kind never change; fields that do not apply to this kind are
    /// ignored. Non-finite numbers reject the whole update before anything is
    /// written. Sizes, rotation and opacity are normalized afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if any numeric field in `partial` is NaN or infinite.
    pub fn apply(&mut self, partial: &PartialObject) -> Result<(), EditorError> {
        partial.validate()?;

        if let Some(name) = &partial.name {
            self.name.clone_from(name);
        }
        if let Some(visible) = partial.visible {
            self.visible = visible;
        }
        if let Some(locked) = partial.locked {
            self.locked = locked;
        }
        if let Some(g) = self.geometry_mut() {
            partial.merge_geometry(g);
        }
        if let Some(style) = self.style_mut() {
            partial.merge_style(style);
        }
        if let Some(opacity) = partial.opacity {
            self.set_opacity(opacity);
        }

        match &mut self.kind {
            ObjectKind::Text(t) => {
                if let Some(content) = &partial.content {
                    t.content.clone_from(content);
                }
                if let Some(family) = &partial.font_family {
                    t.font_family.clone_from(family);
                }
                if let Some(size) = partial.font_size {
                    t.font_size = size;
                }
                if let Some(weight) = partial.font_weight {
                    t.font_weight = weight;
                }
                if let Some(italic) = partial.italic {
                    t.italic = italic;
                }
                if let Some(align) = partial.text_align {
                    t.text_align = align;
                }
            }
            ObjectKind::Shape(s) => {
                if let Some(radius) = partial.corner_radius {
                    if s.shape == ShapeKind::Rectangle {
                        s.corner_radius = radius;
                    }
                }
            }
            ObjectKind::Image(i) => {
                if let Some(src) = &partial.src {
                    i.src.clone_from(src);
                }
            }
            ObjectKind::Background(b) => {
                if let Some(fill) = &partial.fill {
                    b.fill = fill.clone();
                }
            }
        }

        self.normalize();
        Ok(())
    }

    /// Restore geometry/style invariants in place.
    pub fn normalize(&mut self) {
        if let Some(g) = self.geometry_mut() {
            g.normalize();
        }
        if let Some(style) = self.style_mut() {
            style.normalize();
        }
        match &mut self.kind {
            ObjectKind::Text(t) => {
                if t.font_size <= 0.0 {
                    t.font_size = FONT_SIZE_MIN;
                }
            }
            ObjectKind::Shape(s) => {
                s.corner_radius = if s.shape == ShapeKind::Rectangle { s.corner_radius.max(0.0) } else { 0.0 };
            }
            ObjectKind::Image(i) => i.opacity = clamp_opacity(i.opacity),
            ObjectKind::Background(b) => {
                if let BackgroundFill::Gradient(gradient) = &mut b.fill {
                    for stop in &mut gradient.stops {
                        stop.offset = stop.offset.clamp(0.0, 1.0);
                    }
                }
            }
        }
    }

    /// True when every numeric field holds a finite value.
    pub(crate) fn is_finite(&self) -> bool {
        let geometry_ok = self.geometry().is_none_or(Geometry::is_finite);
        let style_ok = self.style().is_none_or(Style::is_finite);
        let kind_ok = match &self.kind {
            ObjectKind::Text(t) => t.font_size.is_finite(),
            ObjectKind::Shape(s) => s.corner_radius.is_finite(),
            ObjectKind::Image(i) => i.opacity.is_finite(),
            ObjectKind::Background(b) => match &b.fill {
                BackgroundFill::Gradient(g) => g.angle.is_finite() && g.stops.iter().all(|s| s.offset.is_finite()),
                BackgroundFill::Solid { .. } | BackgroundFill::Pattern { .. } => true,
            },
        };
        geometry_ok && style_ok && kind_ok
    }
}

/// Sparse update for an object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<BackgroundFill>,
}

impl PartialObject {
    /// Returns `true` if any position, size or transform field is present.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.rotation.is_some()
            || self.scale_x.is_some()
            || self.scale_y.is_some()
    }

    /// Copy of this update with every geometry field cleared.
    #[must_use]
    pub fn without_geometry(&self) -> Self {
        Self { x: None, y: None, width: None, height: None, rotation: None, scale_x: None, scale_y: None, ..self.clone() }
    }

    /// Returns `true` when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> Result<(), EditorError> {
        let numbers = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
            ("scaleX", self.scale_x),
            ("scaleY", self.scale_y),
            ("strokeWidth", self.stroke_width),
            ("opacity", self.opacity),
            ("fontSize", self.font_size),
            ("cornerRadius", self.corner_radius),
        ];
        for (field, value) in numbers {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(EditorError::invalid(field, v));
                }
            }
        }
        Ok(())
    }

    fn merge_geometry(&self, g: &mut Geometry) {
        if let Some(x) = self.x {
            g.x = x;
        }
        if let Some(y) = self.y {
            g.y = y;
        }
        if let Some(w) = self.width {
            g.width = w;
        }
        if let Some(h) = self.height {
            g.height = h;
        }
        if let Some(r) = self.rotation {
            g.rotation = r;
        }
        if let Some(sx) = self.scale_x {
            g.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            g.scale_y = sy;
        }
    }

    fn merge_style(&self, style: &mut Style) {
        if let Some(fill) = &self.fill_color {
            style.fill_color.clone_from(fill);
        }
        if let Some(stroke) = &self.stroke_color {
            style.stroke_color.clone_from(stroke);
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
    }
}
