//! Route a request to a strategy by declared MIME type and name suffix.

use crate::request::ImportRequest;
use serde::Serialize;

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";

const PLAIN_TEXT_SUFFIXES: [&str; 2] = [".txt", ".md"];
const PDF_SUFFIX: &str = ".pdf";

/// Which strategy handles a request. Decided once, never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyDecision {
    /// Decode the bytes directly.
    PlainText,
    /// Parse locally when small enough, else (or on failure) upload.
    BinaryDocument,
    /// No client-side route.
    Unsupported,
}

/// Classify with literal, case-sensitive matching.
///
/// `RESUME.PDF` is `Unsupported` here; see [`classify_with`].
pub fn classify(request: &ImportRequest) -> StrategyDecision {
    classify_with(request, false)
}

/// Classify, optionally ignoring case in suffixes and MIME types.
pub fn classify_with(request: &ImportRequest, case_insensitive: bool) -> StrategyDecision {
    let name = if case_insensitive {
        request.name.to_lowercase()
    } else {
        request.name.clone()
    };
    let type_is = |expected: &str| {
        if case_insensitive {
            request.declared_type.eq_ignore_ascii_case(expected)
        } else {
            request.declared_type == expected
        }
    };

    if type_is(MIME_PLAIN_TEXT) || PLAIN_TEXT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        StrategyDecision::PlainText
    } else if type_is(MIME_PDF) || name.ends_with(PDF_SUFFIX) {
        StrategyDecision::BinaryDocument
    } else {
        StrategyDecision::Unsupported
    }
}
