//! Errors raised by the session, persistence and editor-session layers.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use design::EditorError;

/// Problems with the identity handed to the editor at the session boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The login response carried no usable bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The role could not be mapped onto a known [`Role`](crate::session::Role).
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StudioError {
    /// The persistence API failed. `status` is `None` when no HTTP response
    /// was received at all.
    #[error("network error: {message}")]
    Network { status: Option<u16>, message: String },

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl StudioError {
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Network { status: None, message: err.to_string() }
    }

    /// HTTP status of a failed API call, if a response arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "E_NETWORK",
            Self::Editor(err) => err.error_code(),
            Self::Session(SessionError::MissingToken) => "E_MISSING_TOKEN",
            Self::Session(SessionError::UnknownRole(_)) => "E_UNKNOWN_ROLE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Whether offering the user a retry makes sense.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network { status: None | Some(429 | 500..=599), .. })
    }
}
