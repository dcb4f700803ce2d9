//! Editor error taxonomy.
//!
//! Registry and page-manager errors are ordinary control-flow results: the
//! UI layer decides whether to show a notification or ignore them. Boundary
//! no-ops such as moving the bottom layer further down are not errors at all
//! and are reported through `Ok(false)` by the operations themselves.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// An operation referenced a page or object id that does not exist.
    #[error("not found: {0}")]
    NotFound(Uuid),

    /// An index-based operation was given an index past the sequence end.
    #[error("index out of range: {index} (len {len})")]
    OutOfRange { index: usize, len: usize },

    /// Attempt to delete the only page of a document.
    #[error("cannot delete the last page of a document")]
    LastPageError,

    /// Persisted data could not be turned into a valid document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A field received a value it cannot hold (non-numeric, NaN, infinite).
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The inspector sent a field name this editor does not know.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The field exists but does not apply to this kind of object.
    #[error("field {field} does not apply to {kind} objects")]
    UnsupportedField { field: String, kind: &'static str },

    /// The render adapter reported a handle the bridge never mounted.
    #[error("unmapped canvas handle: {0}")]
    UnmappedHandle(u64),

    /// A selection-scoped edit was requested with nothing selected.
    #[error("no object selected")]
    NoSelection,
}

impl EditorError {
    /// Stable machine-readable code for surfacing errors to the UI layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::OutOfRange { .. } => "E_OUT_OF_RANGE",
            Self::LastPageError => "E_LAST_PAGE",
            Self::MalformedDocument(_) => "E_MALFORMED_DOCUMENT",
            Self::InvalidValue { .. } => "E_INVALID_VALUE",
            Self::UnknownField(_) => "E_UNKNOWN_FIELD",
            Self::UnsupportedField { .. } => "E_UNSUPPORTED_FIELD",
            Self::UnmappedHandle(_) => "E_UNMAPPED_HANDLE",
            Self::NoSelection => "E_NO_SELECTION",
        }
    }

    pub(crate) fn invalid(field: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidValue { field: field.to_owned(), value: value.to_string() }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}
