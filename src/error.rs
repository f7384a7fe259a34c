//! Error types for the resume-import library.
//!
//! Three families reflect the three ways an import can go wrong:
//!
//! * [`LocalParseError`] (**recovered**): the in-process PDF parse failed.
//!   Never shown to the user as a final state; the pipeline logs it and falls
//!   through to the remote parse service.
//!
//! * [`RemoteParseError`]: the remote parse service rejected the upload
//!   or could not be reached, or answered with a body we could not decode.
//!
//! * [`ImportError`] (**terminal**): the failure written to the caller's
//!   error slot. Its `Display` output is the exact user-facing message; no
//!   structured code crosses the pipeline boundary.
//!
//! [`ConfigError`] covers builder validation and credential-file loading.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when a plain-text file cannot be read.
pub const MSG_READ_FAILED: &str = "Failed to read file";

/// Message shown when the file type has no client-side import route.
pub const MSG_UNSUPPORTED: &str =
    "Unsupported file type for client import. Upload PDF/DOCX via the backend instead.";

/// Message shown when the parse service cannot be reached.
pub const MSG_UPLOAD_FAILED: &str = "Failed to upload for parsing";

/// Prefix of every message caused by a parse-service rejection.
pub const MSG_SERVER_PREFIX: &str = "Server failed to parse file: ";

/// Terminal import failures, surfaced to the caller as a single message.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The underlying byte source could not be read (plain-text route).
    #[error("Failed to read file")]
    LocalRead {
        #[source]
        source: std::io::Error,
    },

    /// Classification found no viable route for this file.
    #[error(
        "Unsupported file type for client import. Upload PDF/DOCX via the backend instead."
    )]
    Unsupported,

    /// The remote parse step failed.
    #[error(transparent)]
    Remote(#[from] RemoteParseError),

    /// Unexpected internal error (runtime setup, task failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the remote parse step.
#[derive(Debug, Error)]
pub enum RemoteParseError {
    /// Service answered with a non-success status. `detail` is the response
    /// body, or the numeric status code when the body was empty.
    #[error("Server failed to parse file: {detail}")]
    Rejected { status: u16, detail: String },

    /// Could not reach the service, or the upload could not be assembled.
    #[error("Failed to upload for parsing")]
    Transport { reason: String },

    /// Success status, but the body was not the expected JSON document.
    #[error("Server failed to parse file: invalid response body")]
    MalformedResponse { reason: String },
}

/// Failures of the local PDF parse step. Always recovered by the remote
/// fallback, so the messages are for logs only.
#[derive(Debug, Error)]
pub enum LocalParseError {
    /// Reading the file into memory failed.
    #[error("could not read file for local parsing: {0}")]
    Read(#[source] std::io::Error),

    /// The PDF engine could not be loaded.
    #[error("failed to bind to pdfium library: {0}")]
    EngineUnavailable(String),

    /// The document could not be opened (corrupt, encrypted, not a PDF).
    #[error("could not open document: {0}")]
    Open(String),

    /// A page could not be opened or its text could not be read.
    #[error("text extraction failed on page {page}: {detail}")]
    Page { page: usize, detail: String },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Configuration and credential-store errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The credential file could not be read.
    #[error("Failed to read credential file '{path}': {source}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not a JSON object of slot names to strings.
    #[error("Credential file '{path}' is not valid: {source}")]
    CredentialFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_messages_match_constants() {
        let read = ImportError::LocalRead {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.to_string(), MSG_READ_FAILED);
        assert_eq!(ImportError::Unsupported.to_string(), MSG_UNSUPPORTED);

        let transport: ImportError = RemoteParseError::Transport {
            reason: "connection refused".into(),
        }
        .into();
        assert_eq!(transport.to_string(), MSG_UPLOAD_FAILED);
    }

    #[test]
    fn rejection_display_carries_detail() {
        let e = RemoteParseError::Rejected {
            status: 500,
            detail: "oops".into(),
        };
        assert_eq!(e.to_string(), "Server failed to parse file: oops");
        assert!(e.to_string().starts_with(MSG_SERVER_PREFIX));
    }

    #[test]
    fn transport_display_hides_reason() {
        let e = RemoteParseError::Transport {
            reason: "dns error: no such host".into(),
        };
        assert!(!e.to_string().contains("dns"));
    }

    #[test]
    fn page_error_display() {
        let e = LocalParseError::Page {
            page: 3,
            detail: "bad xref".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("bad xref"));
    }
}
