//! Command execution for the `invitely` CLI.
//!
//! Every editing command loads the document file, applies one operation and
//! writes the file back; the document is only written when the operation
//! succeeded. `push` and `pull` go through an [`EditorSession`] so the CLI
//! exercises the same save path as the editor.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::fs;
use std::path::Path;

use design::geometry::{Geometry, Style};
use design::object::{BackgroundFill, ColorStop, Gradient, GradientKind, ShapeKind};
use design::{Document, EditorError, ObjectId, ObjectKind, PageId, props, serial};
use serde_json::Value;
use studio::{EditorSession, RestDesignStore, Role, SaveApplied, Session, StoreConfig, StudioError};
use tracing::info;
use uuid::Uuid;

use crate::{BackgroundArgs, Cli, CliError, Command, ObjectSubcommand, PageSubcommand};

/// Run a parsed command line and return the text to print.
pub async fn run(cli: Cli, config: &StoreConfig) -> Result<String, CliError> {
    let path = cli.file.as_path();
    match cli.command {
        Command::New { force } => {
            refuse_overwrite(path, force)?;
            write_document(path, &Document::new())?;
            Ok(format!("created {}", path.display()))
        }
        Command::Show => Ok(describe(&read_document(path)?)),
        Command::Page(page) => modify(path, |doc| edit_page(doc, page.command)),
        Command::Object(object) => modify(path, |doc| edit_object(doc, object.command)),
        Command::Set { object, field, value } => modify(path, |doc| set_property(doc, &object, &field, &value)),
        Command::Background(args) => modify(path, |doc| set_background(doc, &args)),
        Command::Push { id, name } => {
            let session = cli_session(cli.token, config)?;
            let store = RestDesignStore::new(config)?;
            let doc = read_document(path)?;
            let mut editor = match id {
                Some(id) => EditorSession::open(doc, id),
                None => EditorSession::new(doc),
            };
            if let Some(name) = name {
                editor.rename(&name);
            }
            match editor.save(&store, &session).await? {
                SaveApplied::Saved { id, .. } => {
                    info!(design = %id, file = %path.display(), "pushed");
                    Ok(id)
                }
                SaveApplied::Failed(err) => Err(err.into()),
                SaveApplied::Ignored => Ok(String::new()),
            }
        }
        Command::Pull { id, force } => {
            refuse_overwrite(path, force)?;
            let session = cli_session(cli.token, config)?;
            let store = RestDesignStore::new(config)?;
            let editor = EditorSession::load(&store, &session, &id).await?;
            write_document(path, editor.document())?;
            info!(design = %id, file = %path.display(), "pulled");
            Ok(format!("pulled {id} into {}", path.display()))
        }
    }
}

// =============================================================================
// FILES & SESSION
// =============================================================================

fn io_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::Io { path: path.display().to_string(), source }
}

fn refuse_overwrite(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::FileExists { path: path.display().to_string() });
    }
    Ok(())
}

pub fn read_document(path: &Path) -> Result<Document, CliError> {
    let blob = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serial::deserialize(&blob)?)
}

pub fn write_document(path: &Path, doc: &Document) -> Result<(), CliError> {
    let mut blob = serde_json::to_string_pretty(&serial::to_value(doc)?)?;
    blob.push('\n');
    fs::write(path, blob).map_err(|e| io_error(path, e))
}

/// Load, edit, and write back only if the edit succeeded.
fn modify(path: &Path, edit: impl FnOnce(&mut Document) -> Result<String, CliError>) -> Result<String, CliError> {
    let mut doc = read_document(path)?;
    let output = edit(&mut doc)?;
    write_document(path, &doc)?;
    Ok(output)
}

/// Headless session for API calls. The token comes from `--token` or the
/// environment.
fn cli_session(token: Option<String>, config: &StoreConfig) -> Result<Session, CliError> {
    let token = token.or_else(|| config.api_token.clone()).ok_or(CliError::MissingToken)?;
    Session::new("cli", "invitely", "", Role::Organizer, &token).map_err(|e| CliError::Studio(StudioError::from(e)))
}

// =============================================================================
// ADDRESSING
// =============================================================================

/// Resolve a 1-based page position or a page id.
pub fn resolve_page(doc: &Document, raw: &str) -> Result<PageId, CliError> {
    let raw = raw.trim();
    if let Ok(position) = raw.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| doc.pages().get(index))
            .map(design::Page::id)
            .ok_or_else(|| CliError::UnknownPage(raw.to_owned()));
    }
    match Uuid::parse_str(raw) {
        Ok(id) if doc.page(&id).is_some() => Ok(id),
        _ => Err(CliError::UnknownPage(raw.to_owned())),
    }
}

/// Resolve a 0-based layer index or an object id on the current page.
pub fn resolve_object(doc: &Document, raw: &str) -> Result<ObjectId, CliError> {
    let raw = raw.trim();
    let page = doc.current_page();
    if let Ok(index) = raw.parse::<usize>() {
        return page
            .objects()
            .get(index)
            .map(|o| o.id)
            .ok_or_else(|| CliError::UnknownObject(raw.to_owned()));
    }
    match Uuid::parse_str(raw) {
        Ok(id) if page.contains(&id) => Ok(id),
        _ => Err(CliError::UnknownObject(raw.to_owned())),
    }
}

// =============================================================================
// EDITING
// =============================================================================

pub fn edit_page(doc: &mut Document, command: PageSubcommand) -> Result<String, CliError> {
    match command {
        PageSubcommand::Add => {
            let id = doc.add_page();
            Ok(format!("added page {} ({id})", doc.page_count()))
        }
        PageSubcommand::Duplicate { page } => {
            let source = resolve_page(doc, &page)?;
            let id = doc.duplicate_page(&source)?;
            Ok(format!("duplicated page as {id}"))
        }
        PageSubcommand::Delete { page } => {
            let id = resolve_page(doc, &page)?;
            doc.delete_page(&id)?;
            Ok(format!("deleted page {id}; {} left", doc.page_count()))
        }
        PageSubcommand::Select { page } => {
            let id = resolve_page(doc, &page)?;
            doc.select_page(&id)?;
            Ok(format!("selected page {id}"))
        }
        PageSubcommand::Rename { page, name } => {
            let id = resolve_page(doc, &page)?;
            doc.rename_page(&id, &name)?;
            Ok(format!("renamed page {id}"))
        }
    }
}

pub fn edit_object(doc: &mut Document, command: ObjectSubcommand) -> Result<String, CliError> {
    let page = doc.selected_page_id();
    match command {
        ObjectSubcommand::AddText { content, x, y, font_size } => {
            require_finite(&[("x", x), ("y", y), ("fontSize", font_size)])?;
            let size = font_size.clamp(design::consts::FONT_SIZE_MIN, design::consts::FONT_SIZE_MAX);
            let id = doc.add_object(&page, ObjectKind::text(&content, x, y, size))?;
            Ok(format!("added text {id}"))
        }
        ObjectSubcommand::AddShape { shape, x, y, width, height, fill } => {
            require_finite(&[("x", x), ("y", y), ("width", width), ("height", height)])?;
            let fill = props::normalize_hex_color(&fill).ok_or_else(|| invalid("fill", &fill))?;
            let kind = ObjectKind::shape(parse_shape(&shape), Geometry::new(x, y, width, height), Style::filled(&fill));
            let id = doc.add_object(&page, kind)?;
            Ok(format!("added shape {id}"))
        }
        ObjectSubcommand::AddImage { src, x, y, width, height } => {
            require_finite(&[("x", x), ("y", y), ("width", width), ("height", height)])?;
            let id = doc.add_object(&page, ObjectKind::image(&src, Geometry::new(x, y, width, height)))?;
            Ok(format!("added image {id}"))
        }
        ObjectSubcommand::Duplicate { object } => {
            let id = resolve_object(doc, &object)?;
            let copy = doc.duplicate_object(&page, &id)?;
            Ok(format!("duplicated {id} as {copy}"))
        }
        ObjectSubcommand::Delete { object } => {
            let id = resolve_object(doc, &object)?;
            doc.delete_object(&page, &id)?;
            Ok(format!("deleted {id}"))
        }
        ObjectSubcommand::Up { object } => {
            let id = resolve_object(doc, &object)?;
            let moved = doc.move_up(&page, &id)?;
            Ok(if moved { format!("moved {id} up") } else { format!("{id} is already first") })
        }
        ObjectSubcommand::Down { object } => {
            let id = resolve_object(doc, &object)?;
            let moved = doc.move_down(&page, &id)?;
            Ok(if moved { format!("moved {id} down") } else { format!("{id} is already last") })
        }
        ObjectSubcommand::Reorder { from, to } => {
            doc.reorder(&page, from, to)?;
            Ok(format!("moved layer {from} to {to}"))
        }
    }
}

/// Apply one inspector edit. `raw` is parsed as JSON when possible so that
/// `24`, `null` and `true` keep their type; anything else is text.
pub fn set_property(doc: &mut Document, object: &str, field: &str, raw: &str) -> Result<String, CliError> {
    let id = resolve_object(doc, object)?;
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw.to_owned()),
    };
    let page = doc.selected_page_id();
    props::edit_object(doc, &page, &id, field, &value)?;
    Ok(format!("set {field} on {id}"))
}

pub fn set_background(doc: &mut Document, args: &BackgroundArgs) -> Result<String, CliError> {
    let fill = if let Some(color) = &args.color {
        let color = props::normalize_hex_color(color).ok_or_else(|| invalid("color", color))?;
        BackgroundFill::Solid { color }
    } else if let Some(pattern) = &args.pattern {
        BackgroundFill::Pattern { id: pattern.trim().to_owned() }
    } else {
        let colors = args.gradient.as_deref().unwrap_or_default();
        BackgroundFill::Gradient(gradient(colors, args.radial, args.angle.unwrap_or_default())?)
    };
    let page = doc.selected_page_id();
    let id = doc.set_background(&page, fill)?;
    Ok(format!("background {id} set"))
}

/// Evenly spaced gradient over `colors`.
fn gradient(colors: &[String], radial: bool, angle: f64) -> Result<Gradient, CliError> {
    if colors.is_empty() {
        return Err(invalid("gradient", "no colors"));
    }
    require_finite(&[("angle", angle)])?;
    let last = colors.len().saturating_sub(1).max(1);
    let mut stops = Vec::with_capacity(colors.len());
    for (index, raw) in colors.iter().enumerate() {
        let color = props::normalize_hex_color(raw).ok_or_else(|| invalid("gradient", raw))?;
        #[allow(clippy::cast_precision_loss)]
        let offset = index as f64 / last as f64;
        stops.push(ColorStop { offset, color });
    }
    let kind = if radial { GradientKind::Radial } else { GradientKind::Linear };
    Ok(Gradient { kind, angle, stops })
}

fn parse_shape(raw: &str) -> ShapeKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "rectangle" | "rect" => ShapeKind::Rectangle,
        "circle" => ShapeKind::Circle,
        "triangle" => ShapeKind::Triangle,
        "ellipse" => ShapeKind::Ellipse,
        "line" => ShapeKind::Line,
        other => ShapeKind::Polygon(other.to_owned()),
    }
}

fn require_finite(values: &[(&str, f64)]) -> Result<(), CliError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, value)) => Err(invalid(field, value)),
        None => Ok(()),
    }
}

fn invalid(field: &str, value: impl std::fmt::Display) -> CliError {
    CliError::Editor(EditorError::InvalidValue { field: field.to_owned(), value: value.to_string() })
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Human-readable outline of pages and layers; `*` marks the current page
/// and selected objects.
#[must_use]
pub fn describe(doc: &Document) -> String {
    let mut lines = Vec::new();
    for (position, page) in doc.pages().iter().enumerate() {
        let marker = if page.id() == doc.selected_page_id() { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {}. {}  {}x{}  {}  {}",
            position + 1,
            page.name(),
            page.width(),
            page.height(),
            page.background_color(),
            page.id()
        ));
        for (index, object) in page.objects().iter().enumerate() {
            let selected = if doc.selected_objects().contains(&object.id) { '*' } else { ' ' };
            let mut line = format!("   {selected}[{index}] {:<10} {}  {}", object.kind.tag(), object.name, object.id);
            if !object.visible {
                line.push_str(" hidden");
            }
            if object.locked {
                line.push_str(" locked");
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}
