//! Bearer credential lookup for the remote parse service.
//!
//! Tokens live in named slots of a key/value store the host owns. The
//! pipeline only reads: it checks [`CREDENTIAL_SLOTS`] in order and uses the
//! first non-empty value. No credential is not an error; the upload simply
//! goes out unauthenticated.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Slot names checked for a bearer token, highest priority first.
pub const CREDENTIAL_SLOTS: [&str; 4] = ["token", "authToken", "accessToken", "jwt"];

/// Read-only access to a store of credential slots.
pub trait CredentialProvider: Send + Sync {
    /// The value stored under `slot`, if any.
    fn get(&self, slot: &str) -> Option<String>;
}

/// Resolve the bearer token to use for one request.
pub fn resolve_credential(provider: &dyn CredentialProvider) -> Option<String> {
    for slot in CREDENTIAL_SLOTS {
        if let Some(value) = provider.get(slot).filter(|v| !v.is_empty()) {
            debug!("Using credential from slot '{}'", slot);
            return Some(value);
        }
    }
    None
}

/// A store with nothing in it.
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn get(&self, _slot: &str) -> Option<String> {
        None
    }
}

/// An in-memory slot store.
#[derive(Default, Clone)]
pub struct MemoryCredentials {
    slots: HashMap<String, String>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `slot`, replacing any previous value.
    pub fn with_slot(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(slot.into(), value.into());
        self
    }

    /// Load slots from a JSON object file, e.g. `{"token": "abc"}`.
    ///
    /// Non-string values are ignored so a file exported from a browser's
    /// local storage with unrelated keys still loads.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CredentialRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: HashMap<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::CredentialFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let slots = parsed
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();

        Ok(Self { slots })
    }
}

impl CredentialProvider for MemoryCredentials {
    fn get(&self, slot: &str) -> Option<String> {
        self.slots.get(slot).cloned()
    }
}

impl CredentialProvider for HashMap<String, String> {
    fn get(&self, slot: &str) -> Option<String> {
        HashMap::get(self, slot).cloned()
    }
}
