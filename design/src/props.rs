//! Property editors: translate an inspector request ("field + value") into a
//! validated object update.
//!
//! The inspector sends field names as the UI knows them (`fontSize`,
//! `strokeWidth`, ...) and raw JSON values, which may be numbers, numeric
//! strings typed into an input, or `null` when a field was cleared. Each
//! request becomes a one-field [`PartialObject`], so the same merge path is
//! used as for canvas gestures.
//!
//! ERROR HANDLING
//! ==============
//! Bad input never reaches the object: non-numeric text, NaN and infinities
//! are rejected with `InvalidValue` and the previous value stays in place.
//! Only width/height and opacity have a documented fallback for a cleared
//! (`null`) field.

#[cfg(test)]
#[path = "props_test.rs"]
mod props_test;

use std::str::FromStr;

use serde_json::Value;

use crate::consts::{
    FALLBACK_OPACITY, FALLBACK_SIZE, FONT_SIZE_MAX, FONT_SIZE_MIN, SCALE_MAX, SCALE_MIN, STROKE_WIDTH_MAX,
    STROKE_WIDTH_MIN,
};
use crate::document::Document;
use crate::error::EditorError;
use crate::geometry::normalize_rotation;
use crate::object::{FontWeight, Object, ObjectId, ObjectKind, PartialObject, ShapeKind, TextAlign};
use crate::page::PageId;

/// Editable object property, named as the inspector sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Visible,
    Locked,
    X,
    Y,
    Width,
    Height,
    Rotation,
    ScaleX,
    ScaleY,
    FillColor,
    StrokeColor,
    StrokeWidth,
    Opacity,
    Content,
    FontFamily,
    FontSize,
    FontWeight,
    Italic,
    TextAlign,
    CornerRadius,
    Src,
}

impl FromStr for Field {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "name" => Self::Name,
            "visible" => Self::Visible,
            "locked" => Self::Locked,
            "x" | "left" => Self::X,
            "y" | "top" => Self::Y,
            "width" => Self::Width,
            "height" => Self::Height,
            "rotation" | "angle" => Self::Rotation,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "fill" | "fillColor" => Self::FillColor,
            "stroke" | "strokeColor" => Self::StrokeColor,
            "strokeWidth" => Self::StrokeWidth,
            "opacity" => Self::Opacity,
            "text" | "content" => Self::Content,
            "fontFamily" => Self::FontFamily,
            "fontSize" => Self::FontSize,
            "fontWeight" => Self::FontWeight,
            "italic" => Self::Italic,
            "textAlign" => Self::TextAlign,
            "cornerRadius" => Self::CornerRadius,
            "src" => Self::Src,
            other => return Err(EditorError::UnknownField(other.to_owned())),
        };
        Ok(field)
    }
}

impl Field {
    /// Canonical inspector name of this field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Visible => "visible",
            Self::Locked => "locked",
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Rotation => "rotation",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::FillColor => "fillColor",
            Self::StrokeColor => "strokeColor",
            Self::StrokeWidth => "strokeWidth",
            Self::Opacity => "opacity",
            Self::Content => "content",
            Self::FontFamily => "fontFamily",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::Italic => "italic",
            Self::TextAlign => "textAlign",
            Self::CornerRadius => "cornerRadius",
            Self::Src => "src",
        }
    }

    /// Whether this field can be set on `object`.
    #[must_use]
    pub fn applies_to(self, object: &Object) -> bool {
        match self {
            Self::Name | Self::Visible | Self::Locked => true,
            Self::X | Self::Y | Self::Width | Self::Height | Self::Rotation | Self::ScaleX | Self::ScaleY => {
                object.geometry().is_some()
            }
            Self::FillColor | Self::StrokeColor | Self::StrokeWidth => object.style().is_some(),
            Self::Opacity => !object.is_background(),
            Self::Content | Self::FontFamily | Self::FontSize | Self::FontWeight | Self::Italic | Self::TextAlign => {
                matches!(object.kind, ObjectKind::Text(_))
            }
            Self::CornerRadius => {
                matches!(&object.kind, ObjectKind::Shape(s) if s.shape == ShapeKind::Rectangle)
            }
            Self::Src => matches!(object.kind, ObjectKind::Image(_)),
        }
    }
}

/// Build the clamped one-field update that setting `field` to `value` on
/// `object` amounts to.
///
/// # Errors
///
/// - `UnsupportedField` if the field does not apply to this object's kind.
/// - `InvalidValue` if the value cannot be interpreted for the field.
pub fn field_update(object: &Object, field: Field, value: &Value) -> Result<PartialObject, EditorError> {
    if !field.applies_to(object) {
        return Err(EditorError::UnsupportedField { field: field.name().to_owned(), kind: object.kind.tag() });
    }

    let name = field.name();
    let mut partial = PartialObject::default();
    match field {
        Field::Name => partial.name = Some(parse_text(name, value)?),
        Field::Visible => partial.visible = Some(parse_bool(name, value)?),
        Field::Locked => partial.locked = Some(parse_bool(name, value)?),
        Field::X => partial.x = Some(require_number(name, value)?),
        Field::Y => partial.y = Some(require_number(name, value)?),
        Field::Width => partial.width = Some(number_or(name, value, FALLBACK_SIZE)?.max(0.0)),
        Field::Height => partial.height = Some(number_or(name, value, FALLBACK_SIZE)?.max(0.0)),
        Field::Rotation => partial.rotation = Some(normalize_rotation(require_number(name, value)?)),
        Field::ScaleX => partial.scale_x = Some(require_number(name, value)?.clamp(SCALE_MIN, SCALE_MAX)),
        Field::ScaleY => partial.scale_y = Some(require_number(name, value)?.clamp(SCALE_MIN, SCALE_MAX)),
        Field::FillColor => partial.fill_color = Some(parse_color(name, value)?),
        Field::StrokeColor => partial.stroke_color = Some(parse_color(name, value)?),
        Field::StrokeWidth => {
            partial.stroke_width = Some(require_number(name, value)?.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX));
        }
        Field::Opacity => partial.opacity = Some(number_or(name, value, FALLBACK_OPACITY)?.clamp(0.0, 1.0)),
        Field::Content => partial.content = Some(parse_text(name, value)?),
        Field::FontFamily => partial.font_family = Some(parse_nonempty(name, value)?),
        Field::FontSize => partial.font_size = Some(require_number(name, value)?.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)),
        Field::FontWeight => partial.font_weight = Some(parse_font_weight(name, value)?),
        Field::Italic => partial.italic = Some(parse_bool(name, value)?),
        Field::TextAlign => partial.text_align = Some(parse_text_align(name, value)?),
        Field::CornerRadius => partial.corner_radius = Some(require_number(name, value)?.max(0.0)),
        Field::Src => partial.src = Some(parse_nonempty(name, value)?),
    }
    Ok(partial)
}

/// Set one property on one object.
///
/// # Errors
///
/// `UnknownField`, `NotFound`, `UnsupportedField` or `InvalidValue`; the
/// object is unchanged on error.
pub fn edit_object(
    doc: &mut Document,
    page: &PageId,
    id: &ObjectId,
    field: &str,
    value: &Value,
) -> Result<(), EditorError> {
    let field: Field = field.parse()?;
    let object = doc
        .page(page)
        .ok_or(EditorError::NotFound(*page))?
        .get(id)
        .ok_or(EditorError::NotFound(*id))?;
    let partial = field_update(object, field, value)?;
    doc.update_object(page, id, &partial)
}

/// Set one property on every selected object of the current page.
///
/// The update is all-or-nothing: if the value is rejected for any selected
/// object, none of them change. Returns the number of objects updated.
///
/// # Errors
///
/// `NoSelection` when nothing is selected, otherwise as [`edit_object`].
pub fn edit_selection(doc: &mut Document, field: &str, value: &Value) -> Result<usize, EditorError> {
    let field: Field = field.parse()?;
    if doc.selected_objects().is_empty() {
        return Err(EditorError::NoSelection);
    }

    let page = doc.current_page();
    let page_id = page.id();
    let mut updates = Vec::with_capacity(doc.selected_objects().len());
    for id in doc.selected_objects() {
        let object = page.get(id).ok_or(EditorError::NotFound(*id))?;
        updates.push((*id, field_update(object, field, value)?));
    }

    for (id, partial) in &updates {
        doc.update_object(&page_id, id, partial)?;
    }
    Ok(updates.len())
}

// =============================================================================
// VALUE PARSING
// =============================================================================

/// Interpret a JSON value as a finite number. `null` means "missing".
fn parse_number(field: &str, value: &Value) -> Result<Option<f64>, EditorError> {
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.trim().parse::<f64>().map_err(|_| EditorError::invalid(field, value))?),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(EditorError::invalid(field, value)),
    }
}

fn require_number(field: &str, value: &Value) -> Result<f64, EditorError> {
    parse_number(field, value)?.ok_or_else(|| EditorError::invalid(field, value))
}

fn number_or(field: &str, value: &Value, fallback: f64) -> Result<f64, EditorError> {
    Ok(parse_number(field, value)?.unwrap_or(fallback))
}

fn parse_bool(field: &str, value: &Value) -> Result<bool, EditorError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(EditorError::invalid(field, value)),
    }
}

fn parse_text(field: &str, value: &Value) -> Result<String, EditorError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| EditorError::invalid(field, value))
}

fn parse_nonempty(field: &str, value: &Value) -> Result<String, EditorError> {
    let text = parse_text(field, value)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EditorError::invalid(field, value));
    }
    Ok(trimmed.to_owned())
}

fn parse_font_weight(field: &str, value: &Value) -> Result<FontWeight, EditorError> {
    match value {
        Value::String(s) if s == "normal" => Ok(FontWeight::Normal),
        Value::String(s) if s == "bold" => Ok(FontWeight::Bold),
        _ => {
            let weight = require_number(field, value)?;
            Ok(if weight >= 600.0 { FontWeight::Bold } else { FontWeight::Normal })
        }
    }
}

fn parse_text_align(field: &str, value: &Value) -> Result<TextAlign, EditorError> {
    match value.as_str() {
        Some("left") => Ok(TextAlign::Left),
        Some("center") => Ok(TextAlign::Center),
        Some("right") => Ok(TextAlign::Right),
        _ => Err(EditorError::invalid(field, value)),
    }
}

/// Accept `#RGB` / `#RRGGBB` (normalized to lowercase `#rrggbb`) or
/// `transparent`.
fn parse_color(field: &str, value: &Value) -> Result<String, EditorError> {
    let raw = parse_text(field, value)?;
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("transparent") {
        return Ok("transparent".to_owned());
    }
    normalize_hex_color(trimmed).ok_or_else(|| EditorError::invalid(field, value))
}

/// Normalize `#RGB` or `#RRGGBB` to lowercase `#rrggbb`.
#[must_use]
pub fn normalize_hex_color(raw: &str) -> Option<String> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_owned(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}
