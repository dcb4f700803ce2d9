//! Editing session plumbing around the `design` document model.
//!
//! SYSTEM CONTEXT
//! ==============
//! `design` knows nothing about users or the network. This crate adds the
//! explicit [`Session`](session::Session) handle (identity, normalized role,
//! bearer token), route guards, the persistence store behind an async trait,
//! and [`EditorSession`](editor::EditorSession), which owns one open document
//! and tracks its saves.

pub mod config;
pub mod editor;
pub mod error;
pub mod session;
pub mod store;

pub use config::StoreConfig;
pub use editor::{EditorSession, PendingSave, SaveApplied, SaveOutcome};
pub use error::{SessionError, StudioError};
pub use session::{Access, AuthState, Role, Route, Session, guard};
pub use store::{DesignId, DesignStore, RestDesignStore, SaveReceipt, SaveRequest};
