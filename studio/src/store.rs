//! Persistence adapter: stores and retrieves serialized designs.
//!
//! DESIGN
//! ======
//! [`DesignStore`] is the seam the editor session talks to; it is an async
//! trait so tests can substitute an in-memory store. [`RestDesignStore`] is
//! the production implementation over the REST API:
//!
//! | Call | Request |
//! |------|---------|
//! | first save | `POST {base}/designs` |
//! | later saves | `PUT {base}/designs/{id}` |
//! | load | `GET {base}/designs/{id}` |
//!
//! Every request carries `Authorization: Bearer <token>` taken from the
//! explicit [`Session`]. Response parsing is kept in pure functions
//! ([`server_message`], [`parse_receipt`], [`extract_document`]) for
//! testability.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::StudioError;
use crate::session::Session;

/// Server-assigned identifier of a stored design.
pub type DesignId = String;

/// Body of a save call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Existing design to overwrite; `None` creates a new design.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DesignId>,
    pub name: String,
    /// Serialized document.
    pub document: Value,
}

/// Acknowledgement of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub id: DesignId,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Storage backend for designs. Enables mocking in tests.
#[async_trait::async_trait]
pub trait DesignStore: Send + Sync {
    /// Persist a design, creating it when `request.id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Network` if the call fails or the server
    /// reports `success: false`.
    async fn save(&self, session: &Session, request: &SaveRequest) -> Result<SaveReceipt, StudioError>;

    /// Fetch the serialized document of a design.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Network` if the call fails.
    async fn load(&self, session: &Session, id: &str) -> Result<Value, StudioError>;
}

// =============================================================================
// REST CLIENT
// =============================================================================

pub struct RestDesignStore {
    http: reqwest::Client,
    base_url: String,
}

impl RestDesignStore {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the HTTP client cannot be constructed.
    pub fn new(config: &StoreConfig) -> Result<Self, StudioError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StudioError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn designs_url(&self) -> String {
        format!("{}/designs", self.base_url)
    }

    fn design_url(&self, id: &str) -> String {
        format!("{}/designs/{id}", self.base_url)
    }

    /// Send an authenticated request and return the JSON body of a 2xx
    /// response.
    async fn send(&self, session: &Session, request: reqwest::RequestBuilder) -> Result<Value, StudioError> {
        let response = request
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| StudioError::transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StudioError::transport(&e))?;
        let body = parse_body(&text);

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            return Err(StudioError::Network { status: Some(status.as_u16()), message });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl DesignStore for RestDesignStore {
    async fn save(&self, session: &Session, request: &SaveRequest) -> Result<SaveReceipt, StudioError> {
        let builder = match &request.id {
            Some(id) => self.http.put(self.design_url(id)),
            None => self.http.post(self.designs_url()),
        };
        let body = self.send(session, builder.json(request)).await?;
        let receipt = parse_receipt(&body, request.id.as_deref())?;
        info!(design = %receipt.id, created = request.id.is_none(), "design saved");
        Ok(receipt)
    }

    async fn load(&self, session: &Session, id: &str) -> Result<Value, StudioError> {
        let body = self.send(session, self.http.get(self.design_url(id))).await?;
        debug!(design = %id, "design fetched");
        extract_document(body)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.trim().to_owned()))
}

/// Human-readable error from a response body: `message`, then `error`
/// (string or `{ "message": ... }`), then a plain-text body.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => ["message", "error"].iter().find_map(|key| match map.get(*key) {
            Some(Value::String(text)) => Some(text.as_str()),
            Some(Value::Object(inner)) => inner.get("message").and_then(Value::as_str),
            _ => None,
        }),
        _ => None,
    };
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned)
}

/// Interpret a save response. `fallback_id` is used when an update response
/// does not echo the id.
///
/// # Errors
///
/// Returns `Network` (without status) for `success: false` or a response
/// with no id.
pub fn parse_receipt(body: &Value, fallback_id: Option<&str>) -> Result<SaveReceipt, StudioError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = server_message(body).unwrap_or_else(|| "save rejected by server".to_owned());
        return Err(StudioError::Network { status: None, message });
    }
    let record = body.get("data").filter(|d| d.is_object()).unwrap_or(body);
    let id = match record.get("id").or_else(|| record.get("_id")) {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => fallback_id.map(str::to_owned),
    };
    let id = id.ok_or_else(|| StudioError::Network { status: None, message: "save response has no id".to_owned() })?;
    Ok(SaveReceipt { success: true, id })
}

/// Pull the document out of a load response. Accepts the bare document or a
/// wrapper with `document`, `design` or `data` holding it (as JSON or as a
/// JSON-encoded string).
///
/// # Errors
///
/// Returns `Editor(MalformedDocument)` when an embedded string is not JSON.
pub fn extract_document(body: Value) -> Result<Value, StudioError> {
    let mut body = body;
    for key in ["document", "design", "data"] {
        if let Some(inner) = body.get_mut(key) {
            let inner = inner.take();
            return match inner {
                Value::String(blob) => {
                    serde_json::from_str(&blob).map_err(|e| StudioError::Editor(design::EditorError::from(e)))
                }
                Value::Object(_) => extract_document(inner),
                other => Ok(other),
            };
        }
    }
    Ok(body)
}
