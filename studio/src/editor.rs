//! Editor session: one open design, its save bookkeeping and its lifetime.
//!
//! DESIGN
//! ======
//! The session owns the [`Document`] exclusively; there are no locks. A save
//! is split into three steps so that local editing never waits on the
//! network:
//!
//! 1. [`EditorSession::begin_save`] snapshots the serialized document and
//!    its revision into an owned [`PendingSave`];
//! 2. [`PendingSave::send`] performs the store call without borrowing the
//!    session;
//! 3. [`EditorSession::finish_save`] applies the [`SaveOutcome`].
//!
//! Two saves may be in flight at once. Outcomes are applied in the order
//! they are handed back, so the last response wins: its design id becomes
//! current and its snapshot revision decides whether the document is clean.
//! After [`close`](EditorSession::close) every outcome is ignored, mirroring
//! an editor view that has been unmounted while a request was pending.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use design::{Document, serial};
use tracing::{debug, info, warn};

use crate::error::StudioError;
use crate::session::Session;
use crate::store::{DesignId, DesignStore, SaveReceipt, SaveRequest};

pub const UNTITLED_DESIGN: &str = "Untitled design";

pub struct EditorSession {
    doc: Document,
    name: String,
    design_id: Option<DesignId>,
    /// Document revision of the snapshot last confirmed by the store.
    saved_revision: Option<u64>,
    next_generation: u64,
    in_flight: usize,
    last_error: Option<StudioError>,
    closed: bool,
}

/// An owned save request, detached from the session that issued it.
#[derive(Debug, Clone)]
pub struct PendingSave {
    generation: u64,
    revision: u64,
    request: SaveRequest,
}

/// Result of sending a [`PendingSave`].
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub generation: u64,
    pub revision: u64,
    pub result: Result<SaveReceipt, StudioError>,
}

/// What [`EditorSession::finish_save`] did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveApplied {
    /// The store accepted the snapshot. `clean` is false if the document was
    /// edited after the snapshot was taken.
    Saved { id: DesignId, clean: bool },
    /// The store call failed; the document is untouched.
    Failed(StudioError),
    /// The session was closed before the response arrived.
    Ignored,
}

impl EditorSession {
    /// Session for a design that has never been saved.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            name: UNTITLED_DESIGN.to_owned(),
            design_id: None,
            saved_revision: None,
            next_generation: 0,
            in_flight: 0,
            last_error: None,
            closed: false,
        }
    }

    /// Session for a design that already exists in the store and matches
    /// `doc` as loaded.
    #[must_use]
    pub fn open(doc: Document, id: DesignId) -> Self {
        let revision = doc.revision();
        Self { design_id: Some(id), saved_revision: Some(revision), ..Self::new(doc) }
    }

    /// Fetch and deserialize a stored design.
    ///
    /// # Errors
    ///
    /// `Network` if the store call fails, `Editor(MalformedDocument)` if the
    /// blob is not a valid document.
    pub async fn load(store: &dyn DesignStore, session: &Session, id: &str) -> Result<Self, StudioError> {
        let blob = store.load(session, id).await?;
        let doc = serial::from_value(blob)?;
        info!(design = %id, pages = doc.page_count(), "design opened");
        Ok(Self::open(doc, id.to_owned()))
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for editing. Changes are picked up through the
    /// document revision; no extra bookkeeping is needed.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: &str) {
        name.trim().clone_into(&mut self.name);
    }

    #[must_use]
    pub fn design_id(&self) -> Option<&str> {
        self.design_id.as_deref()
    }

    /// True unless the store has confirmed the current revision.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.saved_revision != Some(self.doc.revision())
    }

    /// Number of saves started but not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&StudioError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // --- Saving ---

    /// Snapshot the document for saving.
    ///
    /// # Errors
    ///
    /// Returns `Editor(MalformedDocument)` if the document cannot be
    /// serialized.
    pub fn begin_save(&mut self) -> Result<PendingSave, StudioError> {
        let document = serial::to_value(&self.doc)?;
        self.next_generation += 1;
        self.in_flight += 1;
        let pending = PendingSave {
            generation: self.next_generation,
            revision: self.doc.revision(),
            request: SaveRequest { id: self.design_id.clone(), name: self.name.clone(), document },
        };
        debug!(generation = pending.generation, revision = pending.revision, "save started");
        Ok(pending)
    }

    /// Apply a save outcome. Outcomes are applied in arrival order.
    pub fn finish_save(&mut self, outcome: SaveOutcome) -> SaveApplied {
        if self.closed {
            debug!(generation = outcome.generation, "save response after close ignored");
            return SaveApplied::Ignored;
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome.result {
            Ok(receipt) => {
                self.design_id = Some(receipt.id.clone());
                self.saved_revision = Some(outcome.revision);
                self.last_error = None;
                let clean = !self.is_dirty();
                info!(design = %receipt.id, generation = outcome.generation, clean, "save applied");
                SaveApplied::Saved { id: receipt.id, clean }
            }
            Err(err) => {
                warn!(generation = outcome.generation, error = %err, retryable = err.retryable(), "save failed");
                self.last_error = Some(err.clone());
                SaveApplied::Failed(err)
            }
        }
    }

    /// Begin, send and finish one save.
    ///
    /// # Errors
    ///
    /// Returns the store error, or `Editor` if the document cannot be
    /// serialized. A save whose response arrives after close is not an error.
    pub async fn save(&mut self, store: &dyn DesignStore, session: &Session) -> Result<SaveApplied, StudioError> {
        let pending = self.begin_save()?;
        let outcome = pending.send(store, session).await;
        match self.finish_save(outcome) {
            SaveApplied::Failed(err) => Err(err),
            applied => Ok(applied),
        }
    }

    /// Stop applying save responses. In-flight requests are not cancelled.
    pub fn close(&mut self) {
        if !self.closed {
            info!(pending = self.in_flight, dirty = self.is_dirty(), "editor closed");
            self.closed = true;
        }
    }
}

impl PendingSave {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn request(&self) -> &SaveRequest {
        &self.request
    }

    /// Send the snapshot to the store.
    pub async fn send(self, store: &dyn DesignStore, session: &Session) -> SaveOutcome {
        let result = store.save(session, &self.request).await;
        SaveOutcome { generation: self.generation, revision: self.revision, result }
    }
}
