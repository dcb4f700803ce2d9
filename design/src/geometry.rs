//! Geometry and style primitives shared by every placed object.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_COLOR, STROKE_WIDTH_MIN};

/// Position, size and transform of an object in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    /// Unscaled width; never negative.
    pub width: f64,
    /// Unscaled height; never negative.
    pub height: f64,
    /// Clockwise rotation in degrees, kept in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Geometry {
    /// Unrotated, unscaled box at `(x, y)`.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Move the box by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Clamp negative sizes to zero and wrap rotation into `[0, 360)`.
    pub fn normalize(&mut self) {
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);
        self.rotation = normalize_rotation(self.rotation);
    }

    /// Rendered width after applying `scale_x`.
    #[must_use]
    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x.abs()
    }

    /// Rendered height after applying `scale_y`.
    #[must_use]
    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y.abs()
    }

    pub(crate) fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.rotation, self.scale_x, self.scale_y]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `360.0`, which
/// is folded back to zero.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Fill, stroke and opacity of a text or shape object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill_color: String,
    pub stroke_color: String,
    /// Stroke width in page units; never negative.
    #[serde(default)]
    pub stroke_width: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "full_opacity")]
    pub opacity: f64,
}

fn full_opacity() -> f64 {
    1.0
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_COLOR.to_owned(),
            stroke_color: DEFAULT_COLOR.to_owned(),
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

impl Style {
    /// Solid fill with no stroke.
    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self { fill_color: color.to_owned(), ..Self::default() }
    }

    pub fn normalize(&mut self) {
        self.stroke_width = self.stroke_width.max(STROKE_WIDTH_MIN);
        self.opacity = clamp_opacity(self.opacity);
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.stroke_width.is_finite() && self.opacity.is_finite()
    }
}

pub(crate) fn clamp_opacity(opacity: f64) -> f64 {
    opacity.clamp(0.0, 1.0)
}
