//! # resume-import
//!
//! Turn a user-selected resume file into plain text.
//!
//! Given any file, the pipeline decides how to get text out of it, runs
//! that strategy, falls back when it has to, and reports progress and the
//! final result through setters on caller-owned state ([`ImportSink`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Classify  text/plain, *.txt, *.md → plain text
//!  │               application/pdf, *.pdf  → document
//!  │               anything else           → unsupported
//!  ├─ 2. Plain     decode bytes as UTF-8
//!  ├─ 3. Document  ≤ 5 MiB: extract page text locally via PDFium
//!  │               on failure (or when larger): upload to the parse service
//!  └─ 4. Report    resume text, or one human-readable error message
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_import::{ImportConfig, ImportPipeline, ImportRequest, ImportState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Service address from RESUME_IMPORT_API_BASE, else http://localhost:8081
//!     let pipeline = ImportPipeline::new(ImportConfig::from_env()?)?;
//!     let state = ImportState::new();
//!
//!     let request = ImportRequest::from_path("resume.pdf").await;
//!     pipeline.handle_file(Some(&request), &state).await;
//!
//!     let snapshot = state.snapshot();
//!     if snapshot.import_error.is_empty() {
//!         println!("{}", snapshot.resume_text);
//!     } else {
//!         eprintln!("{}", snapshot.import_error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-import` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! resume-import = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod credentials;
pub mod error;
pub mod import;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod session;
pub mod sink;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ImportConfig, ImportConfigBuilder, DEFAULT_BASE_ADDRESS};
pub use credentials::{
    resolve_credential, CredentialProvider, MemoryCredentials, NoCredentials, CREDENTIAL_SLOTS,
};
pub use error::{ConfigError, ImportError, LocalParseError, RemoteParseError};
pub use import::{
    import_file, import_file_sync, ImportPipeline, PROGRESS_LOCAL_PARSE, PROGRESS_UPLOAD_FALLBACK,
};
pub use output::ImportOutcome;
pub use pipeline::classify::{classify, classify_with, StrategyDecision};
pub use pipeline::pdf::{PageItems, PdfTextSource, PdfiumTextSource};
pub use pipeline::remote::{ParsedResume, RemoteParseClient};
pub use request::{FileSource, ImportRequest};
pub use session::{ImportSession, ImportTicket};
pub use sink::{ImportSink, ImportState, NoopSink, SinkEvent, StateSnapshot};
