//! Caller-owned state the pipeline writes into.
//!
//! The pipeline never returns state to a UI directly; it calls setters on an
//! [`ImportSink`] as the import progresses. Hosts implement the trait over
//! whatever holds their state (a terminal spinner, a form model, a channel).
//!
//! Progress notifications share the error slot with terminal failures: a
//! progress message is simply an error-slot value that a later write
//! overwrites. [`ImportSink::on_progress`] defaults to exactly that, so hosts
//! that want to render progress differently override one method.
//!
//! # Example
//!
//! ```rust
//! use resume_import::{ImportSink, ImportState};
//!
//! let state = ImportState::new();
//! state.set_import_name("resume.txt");
//! state.set_resume_text("Hi");
//! assert_eq!(state.snapshot().resume_text, "Hi");
//! ```

use std::sync::{Arc, Mutex, PoisonError};

/// Setters invoked by the pipeline.
///
/// Implementations must be `Send + Sync`: imports run on tokio tasks and the
/// [`crate::session::ImportSession`] shares one sink across them.
pub trait ImportSink: Send + Sync {
    /// Replace the resume text wholesale.
    fn set_resume_text(&self, text: &str);

    /// Set the error slot. An empty string clears it.
    fn set_import_error(&self, message: &str);

    /// Record the name of the file being imported, for display.
    fn set_import_name(&self, name: &str);

    /// A non-terminal status message, e.g. "Parsing PDF locally...".
    fn on_progress(&self, message: &str) {
        self.set_import_error(message);
    }
}

impl<T: ImportSink + ?Sized> ImportSink for Arc<T> {
    fn set_resume_text(&self, text: &str) {
        (**self).set_resume_text(text)
    }

    fn set_import_error(&self, message: &str) {
        (**self).set_import_error(message)
    }

    fn set_import_name(&self, name: &str) {
        (**self).set_import_name(name)
    }

    fn on_progress(&self, message: &str) {
        (**self).on_progress(message)
    }
}

/// Discards every write.
pub struct NoopSink;

impl ImportSink for NoopSink {
    fn set_resume_text(&self, _text: &str) {}
    fn set_import_error(&self, _message: &str) {}
    fn set_import_name(&self, _name: &str) {}
}

/// One recorded write, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    ResumeText(String),
    ImportError(String),
    ImportName(String),
    Progress(String),
}

/// Current values of the three caller-owned slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub resume_text: String,
    pub import_error: String,
    pub import_name: String,
}

#[derive(Default)]
struct Inner {
    state: StateSnapshot,
    events: Vec<SinkEvent>,
}

/// Thread-safe in-memory sink: the three slots plus an ordered event log.
#[derive(Default)]
pub struct ImportState {
    inner: Mutex<Inner>,
}

impl ImportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some resume text already in place (e.g. pasted by the user).
    pub fn with_resume_text(text: impl Into<String>) -> Self {
        let state = Self::default();
        state.lock().state.resume_text = text.into();
        state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.lock().state.clone()
    }

    /// Every write so far, oldest first.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().events.clone()
    }

    /// Progress messages emitted so far, oldest first.
    pub fn progress_messages(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Progress(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImportSink for ImportState {
    fn set_resume_text(&self, text: &str) {
        let mut inner = self.lock();
        inner.state.resume_text = text.to_string();
        inner.events.push(SinkEvent::ResumeText(text.to_string()));
    }

    fn set_import_error(&self, message: &str) {
        let mut inner = self.lock();
        inner.state.import_error = message.to_string();
        inner.events.push(SinkEvent::ImportError(message.to_string()));
    }

    fn set_import_name(&self, name: &str) {
        let mut inner = self.lock();
        inner.state.import_name = name.to_string();
        inner.events.push(SinkEvent::ImportName(name.to_string()));
    }

    fn on_progress(&self, message: &str) {
        let mut inner = self.lock();
        inner.state.import_error = message.to_string();
        inner.events.push(SinkEvent::Progress(message.to_string()));
    }
}
