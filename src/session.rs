//! Supersedable imports over a shared sink.
//!
//! A host that lets the user pick a new file while the previous import is
//! still running should not rely on "whoever finishes last wins".
//! [`ImportSession`] runs each import as a tokio task keyed by a request id.
//! Submitting a new file aborts the in-flight task and invalidates its id, so
//! even a write racing with the abort is dropped: every sink write is checked
//! against the current id under a write gate that `submit` also takes while
//! bumping the id.
//!
//! Sink writes may read [`ImportSession::current_id`], which never locks.
//! They must not call [`ImportSession::submit`] or [`ImportSession::cancel`]:
//! both wait for the write in progress to finish.
//!
//! # Example
//!
//! ```rust,no_run
//! use resume_import::{ImportConfig, ImportPipeline, ImportRequest, ImportSession, ImportState};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Arc::new(ImportPipeline::new(ImportConfig::from_env()?)?);
//! let state = Arc::new(ImportState::new());
//! let session = ImportSession::new(pipeline, state.clone());
//!
//! let first = session.submit(Some(ImportRequest::from_path("big.pdf").await));
//! let second = session.submit(Some(ImportRequest::from_path("resume.txt").await));
//!
//! assert!(first.unwrap().wait().await.is_none()); // superseded
//! let outcome = second.unwrap().wait().await;
//! println!("{:?} / {}", outcome, state.snapshot().resume_text);
//! # Ok(())
//! # }
//! ```

use crate::import::ImportPipeline;
use crate::output::ImportOutcome;
use crate::request::ImportRequest;
use crate::sink::ImportSink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

#[derive(Default)]
struct Shared {
    /// Id of the most recent submission.
    latest: AtomicU64,
    /// Held across each forwarded sink write and each id bump.
    writes: Mutex<()>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl Shared {
    /// Invalidate every earlier id. Returns the new one.
    fn bump(&self) -> u64 {
        let _writes = lock(&self.writes);
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == id
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs imports so that only the latest submission can touch the sink.
pub struct ImportSession {
    pipeline: Arc<ImportPipeline>,
    sink: Arc<dyn ImportSink>,
    shared: Arc<Shared>,
}

impl ImportSession {
    pub fn new(pipeline: Arc<ImportPipeline>, sink: Arc<dyn ImportSink>) -> Self {
        Self {
            pipeline,
            sink,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Start importing `request`, superseding any import still running.
    ///
    /// `None` (a dismissed dialog) changes nothing and returns `None`; the
    /// in-flight import, if any, keeps running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, request: Option<ImportRequest>) -> Option<ImportTicket> {
        let request = request?;

        let mut in_flight = lock(&self.shared.in_flight);
        let id = self.shared.bump();
        if let Some(previous) = in_flight.take() {
            debug!("Import #{} supersedes the in-flight import", id);
            previous.abort();
        }

        let guarded = GuardedSink {
            id,
            shared: Arc::clone(&self.shared),
            inner: Arc::clone(&self.sink),
        };
        let pipeline = Arc::clone(&self.pipeline);
        let shared = Arc::clone(&self.shared);

        let handle = tokio::spawn(async move {
            let outcome = pipeline.import(&request, &guarded).await;
            let mut in_flight = lock(&shared.in_flight);
            if !shared.is_latest(id) {
                return None;
            }
            *in_flight = None;
            Some(outcome)
        });
        *in_flight = Some(handle.abort_handle());

        Some(ImportTicket { id, handle })
    }

    /// Abort the in-flight import, if any, without starting a new one.
    pub fn cancel(&self) {
        let mut in_flight = lock(&self.shared.in_flight);
        self.shared.bump();
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
    }

    /// Id of the most recent submission (0 before the first).
    pub fn current_id(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }
}

/// Handle to one submitted import.
#[derive(Debug)]
pub struct ImportTicket {
    id: u64,
    handle: JoinHandle<Option<ImportOutcome>>,
}

impl ImportTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the import. `None` when it was superseded or cancelled.
    pub async fn wait(self) -> Option<ImportOutcome> {
        self.handle.await.ok().flatten()
    }
}

/// Forwards writes only while `id` is still the session's current request.
struct GuardedSink {
    id: u64,
    shared: Arc<Shared>,
    inner: Arc<dyn ImportSink>,
}

impl GuardedSink {
    fn forward(&self, write: impl FnOnce(&dyn ImportSink)) {
        let _writes = lock(&self.shared.writes);
        if self.shared.is_latest(self.id) {
            write(self.inner.as_ref());
        }
    }
}

impl ImportSink for GuardedSink {
    fn set_resume_text(&self, text: &str) {
        self.forward(|s| s.set_resume_text(text));
    }

    fn set_import_error(&self, message: &str) {
        self.forward(|s| s.set_import_error(message));
    }

    fn set_import_name(&self, name: &str) {
        self.forward(|s| s.set_import_name(name));
    }

    fn on_progress(&self, message: &str) {
        self.forward(|s| s.on_progress(message));
    }
}
