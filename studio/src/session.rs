//! Explicit session handle, normalized roles and route guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login endpoint returns the user's role in several historical shapes
//! (a bare string, `{"name": ...}`, `{"role": ...}`, a list of role names).
//! [`Role::from_raw`] collapses them once, at the session boundary, so role
//! checks downstream are plain enum comparisons. The resulting [`Session`] is
//! passed explicitly to the persistence store and to [`guard`]; nothing reads
//! identity from ambient state.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SessionError;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Organizer,
}

impl Role {
    /// Normalize a role as delivered by the login API.
    ///
    /// A list resolves to its most privileged recognized entry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRole` when no recognized role name is found.
    pub fn from_raw(raw: &Value) -> Result<Self, SessionError> {
        match raw {
            Value::String(name) => Self::from_name(name).ok_or_else(|| SessionError::UnknownRole(name.clone())),
            Value::Object(map) => {
                let inner = map.get("name").or_else(|| map.get("role"));
                match inner {
                    Some(inner) => Self::from_raw(inner),
                    None => Err(SessionError::UnknownRole(raw.to_string())),
                }
            }
            Value::Array(items) => {
                let roles: Vec<Self> = items.iter().filter_map(|item| Self::from_raw(item).ok()).collect();
                if roles.contains(&Self::Admin) {
                    Ok(Self::Admin)
                } else if roles.contains(&Self::Organizer) {
                    Ok(Self::Organizer)
                } else {
                    Err(SessionError::UnknownRole(raw.to_string()))
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Err(SessionError::UnknownRole(raw.to_string())),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" | "superadmin" => Some(Self::Admin),
            "organizer" | "organiser" => Some(Self::Organizer),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Organizer => "organizer",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Authenticated user plus the bearer token injected into API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    name: String,
    email: String,
    role: Role,
    token: String,
}

impl Session {
    /// # Errors
    ///
    /// Returns `MissingToken` if `token` is blank.
    pub fn new(user_id: &str, name: &str, email: &str, role: Role, token: &str) -> Result<Self, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::MissingToken);
        }
        Ok(Self {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            email: email.to_owned(),
            role,
            token: token.to_owned(),
        })
    }

    /// Build a session from a login response body:
    /// `{"token": "...", "user": {"id", "name", "email", "role"}}`.
    ///
    /// # Errors
    ///
    /// `MissingToken` when there is no token, `UnknownRole` when the role is
    /// absent or unrecognized.
    pub fn from_login(body: &Value) -> Result<Self, SessionError> {
        let token = body
            .get("token")
            .or_else(|| body.get("accessToken"))
            .and_then(Value::as_str)
            .ok_or(SessionError::MissingToken)?;
        let user = body.get("user").unwrap_or(body);
        let role = user
            .get("role")
            .or_else(|| user.get("roles"))
            .ok_or_else(|| SessionError::UnknownRole("missing".to_owned()))?;
        let role = Role::from_raw(role)?;

        let user_id = match user.get("id").or_else(|| user.get("_id")) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };
        let text = |key: &str| user.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();
        Self::new(&user_id, &text("name"), &text("email"), role, token)
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Bearer token for the `Authorization` header.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// AUTH STATE & ROUTE GUARDS
// =============================================================================

/// Auth state as seen by route guards.
///
/// `rehydrated` is false until the persisted session (if any) has been
/// restored; guards must not redirect before that.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub session: Option<Session>,
    pub rehydrated: bool,
}

impl AuthState {
    /// State after restoring a persisted session.
    #[must_use]
    pub fn restored(session: Option<Session>) -> Self {
        Self { session, rehydrated: true }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
        self.rehydrated = true;
    }

    pub fn sign_out(&mut self) {
        self.session = None;
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Projects,
    Events,
    Guests,
    Editor,
    Admin,
}

impl Route {
    /// Resolve a URL path to a route; sub-paths map to their section.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let section = path.trim_start_matches('/').split('/').next().unwrap_or_default();
        let route = match section {
            "login" => Self::Login,
            "" | "dashboard" => Self::Dashboard,
            "projects" => Self::Projects,
            "events" => Self::Events,
            "guests" => Self::Guests,
            "editor" | "designs" => Self::Editor,
            "admin" => Self::Admin,
            _ => return None,
        };
        Some(route)
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        self == Self::Login
    }

    #[must_use]
    pub fn requires_admin(self) -> bool {
        self == Self::Admin
    }
}

/// Outcome of a route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Session restore is still pending; render nothing yet.
    Wait,
    Redirect(&'static str),
}

/// Decide whether the current user may open `route`.
#[must_use]
pub fn guard(state: &AuthState, route: Route) -> Access {
    if !state.rehydrated {
        return Access::Wait;
    }
    match (&state.session, route) {
        (Some(_), Route::Login) => Access::Redirect(DASHBOARD_PATH),
        (None, route) if route.is_public() => Access::Allow,
        (None, _) => Access::Redirect(LOGIN_PATH),
        (Some(session), route) if route.requires_admin() && !session.role().is_admin() => {
            Access::Redirect(DASHBOARD_PATH)
        }
        (Some(_), _) => Access::Allow,
    }
}
