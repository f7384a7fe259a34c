//! Import entry points.
//!
//! [`ImportPipeline::handle_file`] is the dispatcher: it records the file
//! name, clears the previous error, classifies the file, runs the matching
//! strategy and writes exactly one terminal outcome into the caller's
//! [`ImportSink`].
//!
//! The PDF route is a two-step chain with a typed result per step:
//! a local attempt (`Result<String, LocalParseError>`) and, when that fails
//! or is skipped, the remote upload (`Result<ParsedResume, RemoteParseError>`).
//! A local failure is logged and turned into a progress notification; it is
//! never the final state.

use crate::config::ImportConfig;
use crate::error::{ImportError, LocalParseError, RemoteParseError};
use crate::output::ImportOutcome;
use crate::pipeline::classify::{classify_with, StrategyDecision};
use crate::pipeline::pdf::{parse_pdf, PdfTextSource, PdfiumTextSource};
use crate::pipeline::remote::{RemoteParseClient, Upload};
use crate::pipeline::{decode, remote::ParsedResume};
use crate::request::ImportRequest;
use crate::sink::{ImportSink, NoopSink};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress shown while a PDF is parsed in-process.
pub const PROGRESS_LOCAL_PARSE: &str = "Parsing PDF locally...";

/// Progress shown when local parsing failed and the upload starts.
pub const PROGRESS_UPLOAD_FALLBACK: &str = "Local PDF parsing failed, uploading to server...";

/// The resume-import pipeline.
#[derive(Clone)]
pub struct ImportPipeline {
    config: ImportConfig,
    pdf_source: Arc<dyn PdfTextSource>,
    remote: RemoteParseClient,
}

impl ImportPipeline {
    pub fn new(config: ImportConfig) -> Result<Self, ImportError> {
        let pdf_source = config
            .pdf_source
            .clone()
            .unwrap_or_else(|| Arc::new(PdfiumTextSource::new()));
        let remote = RemoteParseClient::new(config.clone())?;
        Ok(Self {
            config,
            pdf_source,
            remote,
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Route `request` without running anything.
    pub fn classify(&self, request: &ImportRequest) -> StrategyDecision {
        classify_with(request, self.config.case_insensitive_suffixes)
    }

    /// Import one file into `sink`.
    ///
    /// `None` (e.g. a dismissed file dialog) is a no-op: nothing is written
    /// and `None` is returned.
    pub async fn handle_file(
        &self,
        request: Option<&ImportRequest>,
        sink: &dyn ImportSink,
    ) -> Option<ImportOutcome> {
        match request {
            Some(request) => Some(self.import(request, sink).await),
            None => None,
        }
    }

    /// Import `request` into `sink` and return the terminal outcome.
    pub async fn import(&self, request: &ImportRequest, sink: &dyn ImportSink) -> ImportOutcome {
        let start = Instant::now();

        sink.set_import_error("");
        sink.set_import_name(&request.name);

        let decision = self.classify(request);
        info!("Importing '{}' via {:?}", request.name, decision);

        let result = match decision {
            StrategyDecision::PlainText => decode::decode_text(request).await,
            StrategyDecision::BinaryDocument => self.import_document(request, sink).await,
            StrategyDecision::Unsupported => Err(ImportError::Unsupported),
        };

        match &result {
            Ok(text) => {
                sink.set_import_error("");
                sink.set_resume_text(text);
                info!(
                    "Imported '{}': {} chars in {}ms",
                    request.name,
                    text.len(),
                    start.elapsed().as_millis()
                );
            }
            Err(e) => {
                sink.set_import_error(&e.to_string());
                warn!("Import of '{}' failed: {}", request.name, e);
            }
        }

        result.into()
    }

    /// Local-then-remote sequencer for PDF documents.
    async fn import_document(
        &self,
        request: &ImportRequest,
        sink: &dyn ImportSink,
    ) -> Result<String, ImportError> {
        let mut buffer = None;

        if self.local_parse_eligible(request) {
            sink.on_progress(PROGRESS_LOCAL_PARSE);
            match self.parse_locally(request, &mut buffer).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Local PDF parse of '{}' failed: {}", request.name, e);
                    sink.on_progress(PROGRESS_UPLOAD_FALLBACK);
                }
            }
        } else {
            debug!(
                "Skipping local parse of '{}' (size {:?}, ceiling {})",
                request.name, request.size_bytes, self.config.local_parse_max_bytes
            );
        }

        let parsed = self.parse_remotely(request, buffer).await?;
        Ok(parsed.raw_text)
    }

    /// Known, non-zero and within the ceiling.
    fn local_parse_eligible(&self, request: &ImportRequest) -> bool {
        matches!(request.size_bytes, Some(n) if n > 0 && n <= self.config.local_parse_max_bytes)
    }

    /// Read the file into `buffer` (so a later upload can reuse it) and
    /// extract its text.
    async fn parse_locally(
        &self,
        request: &ImportRequest,
        buffer: &mut Option<Vec<u8>>,
    ) -> Result<String, LocalParseError> {
        let bytes = request.read_all().await.map_err(LocalParseError::Read)?;
        *buffer = Some(bytes.clone());
        parse_pdf(self.pdf_source.as_ref(), bytes).await
    }

    async fn parse_remotely(
        &self,
        request: &ImportRequest,
        buffer: Option<Vec<u8>>,
    ) -> Result<ParsedResume, RemoteParseError> {
        let bytes = match buffer {
            Some(bytes) => bytes,
            None => request
                .read_all()
                .await
                .map_err(|e| RemoteParseError::Transport {
                    reason: format!("could not read '{}': {}", request.name, e),
                })?,
        };

        self.remote
            .parse(Upload {
                file_name: request.name.clone(),
                content_type: request.declared_type.clone(),
                bytes,
            })
            .await
    }
}

/// Import a single file with `config`, discarding sink writes.
///
/// Convenience for callers that only want the outcome.
pub async fn import_file(
    request: &ImportRequest,
    config: &ImportConfig,
) -> Result<ImportOutcome, ImportError> {
    let pipeline = ImportPipeline::new(config.clone())?;
    Ok(pipeline.import(request, &NoopSink).await)
}

/// Synchronous wrapper around [`import_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn import_file_sync(
    request: &ImportRequest,
    config: &ImportConfig,
) -> Result<ImportOutcome, ImportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ImportError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(import_file(request, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ImportState, SinkEvent};

    fn pipeline() -> ImportPipeline {
        // Port 1 refuses connections, so a stray upload fails fast.
        let config = ImportConfig::builder()
            .base_address("http://127.0.0.1:1")
            .build()
            .unwrap();
        ImportPipeline::new(config).unwrap()
    }

    #[tokio::test]
    async fn none_is_a_noop() {
        let state = ImportState::with_resume_text("kept");
        let outcome = pipeline().handle_file(None, &state).await;
        assert!(outcome.is_none());
        assert!(state.events().is_empty());
        assert_eq!(state.snapshot().resume_text, "kept");
    }

    #[tokio::test]
    async fn name_is_recorded_before_anything_else() {
        let state = ImportState::new();
        let req = ImportRequest::from_bytes("resume.exe", "", b"MZ".to_vec());
        pipeline().handle_file(Some(&req), &state).await;

        let events = state.events();
        assert_eq!(events[0], SinkEvent::ImportError(String::new()));
        assert_eq!(events[1], SinkEvent::ImportName("resume.exe".into()));
    }

    #[test]
    fn local_parse_eligibility() {
        let p = pipeline();
        let req = |size| ImportRequest::from_bytes("a.pdf", "", Vec::new()).with_size(size);
        assert!(p.local_parse_eligible(&req(Some(1))));
        assert!(p.local_parse_eligible(&req(Some(5_242_880))));
        assert!(!p.local_parse_eligible(&req(Some(5_242_881))));
        assert!(!p.local_parse_eligible(&req(Some(0))));
        assert!(!p.local_parse_eligible(&req(None)));
    }

    #[tokio::test]
    async fn import_file_returns_outcome() {
        let req = ImportRequest::from_bytes("resume.md", "", b"# Jane".to_vec());
        let outcome = import_file(&req, &ImportConfig::default()).await.unwrap();
        assert_eq!(outcome.text(), Some("# Jane"));
    }

    #[test]
    fn import_file_sync_works_outside_runtime() {
        let req = ImportRequest::from_bytes("resume.txt", "", b"Hi".to_vec());
        let outcome = import_file_sync(&req, &ImportConfig::default()).unwrap();
        assert_eq!(outcome, ImportOutcome::Success { text: "Hi".into() });
    }
}
