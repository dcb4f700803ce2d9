//! Shared numeric constants and defaults for the design crate.

// ── Pages ───────────────────────────────────────────────────────

/// Width of the default page in canvas units.
pub const DEFAULT_PAGE_WIDTH: f64 = 800.0;

/// Height of the default page in canvas units.
pub const DEFAULT_PAGE_HEIGHT: f64 = 600.0;

/// Background color of the default page.
pub const DEFAULT_PAGE_BACKGROUND: &str = "#ffffff";

// ── Objects ─────────────────────────────────────────────────────

/// Offset applied to both axes of a duplicated object so it does not sit
/// exactly on top of its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Width and height used when an inspector clears a size field.
pub const FALLBACK_SIZE: f64 = 100.0;

/// Opacity used when an inspector clears the opacity field.
pub const FALLBACK_OPACITY: f64 = 1.0;

/// Font family of new text objects.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Font size of new text objects.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Fill color of new text and shape objects.
pub const DEFAULT_COLOR: &str = "#000000";

// ── Inspector clamps ────────────────────────────────────────────

/// Smallest font size the inspector accepts.
pub const FONT_SIZE_MIN: f64 = 8.0;

/// Largest font size the inspector accepts.
pub const FONT_SIZE_MAX: f64 = 72.0;

/// Thinnest stroke.
pub const STROKE_WIDTH_MIN: f64 = 0.0;

/// Thickest stroke.
pub const STROKE_WIDTH_MAX: f64 = 20.0;

/// Lower bound for `scaleX`/`scaleY`; scale must stay positive.
pub const SCALE_MIN: f64 = 0.01;

/// Upper bound for `scaleX`/`scaleY`.
pub const SCALE_MAX: f64 = 100.0;

// ── Starter template ────────────────────────────────────────────

/// Title text of the starter page.
pub const TEMPLATE_TITLE: &str = "Your Event Title";

/// Title font size of the starter page.
pub const TEMPLATE_TITLE_FONT_SIZE: f64 = 48.0;

/// Subtitle text of the starter page.
pub const TEMPLATE_SUBTITLE: &str = "Add a subtitle with the date and venue";

/// Subtitle font size of the starter page.
pub const TEMPLATE_SUBTITLE_FONT_SIZE: f64 = 24.0;
