//! The terminal result of one import.

use crate::error::ImportError;
use serde::{Deserialize, Serialize};

/// What an import produced. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Text was obtained and written to the resume-text slot.
    Success { text: String },
    /// The import failed; `message` was written to the error slot.
    Failure { message: String },
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }

    /// The extracted text, if the import succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ImportOutcome::Success { text } => Some(text),
            ImportOutcome::Failure { .. } => None,
        }
    }

    /// The user-facing message, if the import failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            ImportOutcome::Success { .. } => None,
            ImportOutcome::Failure { message } => Some(message),
        }
    }
}

impl From<Result<String, ImportError>> for ImportOutcome {
    fn from(result: Result<String, ImportError>) -> Self {
        match result {
            Ok(text) => ImportOutcome::Success { text },
            Err(e) => ImportOutcome::Failure {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serialises_with_tag() {
        let ok = ImportOutcome::Success { text: "Hi".into() };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["text"], "Hi");

        let failed: ImportOutcome = Err::<String, _>(ImportError::Unsupported).into();
        assert!(!failed.is_success());
        assert!(failed.message().unwrap().starts_with("Unsupported file type"));
        assert_eq!(failed.text(), None);
    }
}
