//! Configuration for the import pipeline.
//!
//! Everything the pipeline would otherwise look up ad hoc (service address,
//! stored credentials, PDF engine) is passed in through [`ImportConfig`] at
//! construction time. Build it with [`ImportConfig::builder()`], take the
//! defaults, or read the service address from the environment with
//! [`ImportConfig::from_env()`].

use crate::credentials::{CredentialProvider, NoCredentials};
use crate::error::ConfigError;
use crate::pipeline::pdf::PdfTextSource;
use std::fmt;
use std::sync::Arc;

/// Service address used when nothing else is configured.
pub const DEFAULT_BASE_ADDRESS: &str = "http://localhost:8081";

/// Environment variable that overrides the service address.
pub const BASE_ADDRESS_ENV: &str = "RESUME_IMPORT_API_BASE";

/// Largest file (in bytes) parsed in-process before going straight to the
/// remote service: 5 MiB.
pub const DEFAULT_LOCAL_PARSE_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Configuration for an [`crate::ImportPipeline`].
///
/// # Example
/// ```rust
/// use resume_import::{ImportConfig, MemoryCredentials};
/// use std::sync::Arc;
///
/// let config = ImportConfig::builder()
///     .base_address("https://api.example.com")
///     .credentials(Arc::new(MemoryCredentials::new().with_slot("token", "abc")))
///     .build()
///     .unwrap();
/// assert_eq!(config.base_address, "https://api.example.com");
/// ```
#[derive(Clone)]
pub struct ImportConfig {
    /// Base URL of the remote parse service, without a trailing slash.
    /// Default: `http://localhost:8081`.
    pub base_address: String,

    /// Where bearer tokens are read from. Default: no credentials.
    pub credentials: Arc<dyn CredentialProvider>,

    /// PDF text source for local parsing. `None` uses PDFium.
    pub pdf_source: Option<Arc<dyn PdfTextSource>>,

    /// Size ceiling for local PDF parsing. Default: 5 MiB.
    pub local_parse_max_bytes: u64,

    /// Match `.txt`/`.md`/`.pdf` suffixes and MIME types regardless of case.
    /// Default: false (only the lowercase literals match).
    pub case_insensitive_suffixes: bool,

    /// Timeout for the upload request. `None` leaves the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            credentials: Arc::new(NoCredentials),
            pdf_source: None,
            local_parse_max_bytes: DEFAULT_LOCAL_PARSE_MAX_BYTES,
            case_insensitive_suffixes: false,
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfig")
            .field("base_address", &self.base_address)
            .field("credentials", &"<dyn CredentialProvider>")
            .field(
                "pdf_source",
                &self.pdf_source.as_ref().map(|_| "<dyn PdfTextSource>"),
            )
            .field("local_parse_max_bytes", &self.local_parse_max_bytes)
            .field("case_insensitive_suffixes", &self.case_insensitive_suffixes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ImportConfig {
    /// Create a new builder for `ImportConfig`.
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults, with the service address taken from
    /// `RESUME_IMPORT_API_BASE` when it is set and non-empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder()
            .base_address(base_address_from(std::env::var(BASE_ADDRESS_ENV).ok()))
            .build()
    }

    /// Full URL of the parse endpoint.
    pub fn parse_endpoint(&self) -> String {
        format!("{}/api/resumes/parse", self.base_address)
    }
}

/// Pick the override when present and non-empty, else the default address.
pub fn base_address_from(override_value: Option<String>) -> String {
    override_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_ADDRESS.to_string())
}

/// Builder for [`ImportConfig`].
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl fmt::Debug for ImportConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ImportConfigBuilder {
    pub fn base_address(mut self, address: impl Into<String>) -> Self {
        self.config.base_address = address.into();
        self
    }

    pub fn credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.config.credentials = provider;
        self
    }

    pub fn pdf_source(mut self, source: Arc<dyn PdfTextSource>) -> Self {
        self.config.pdf_source = Some(source);
        self
    }

    pub fn local_parse_max_bytes(mut self, bytes: u64) -> Self {
        self.config.local_parse_max_bytes = bytes;
        self
    }

    pub fn case_insensitive_suffixes(mut self, v: bool) -> Self {
        self.config.case_insensitive_suffixes = v;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ImportConfig, ConfigError> {
        let trimmed = self.config.base_address.trim().trim_end_matches('/');
        let url = reqwest::Url::parse(trimmed).map_err(|e| {
            ConfigError::Invalid(format!(
                "base address '{}' is not a valid URL: {}",
                self.config.base_address, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "base address must use http or https, got '{}'",
                url.scheme()
            )));
        }
        self.config.base_address = trimmed.to_string();

        if self.config.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request timeout must be at least 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ImportConfig::default();
        assert_eq!(c.base_address, "http://localhost:8081");
        assert_eq!(c.local_parse_max_bytes, 5_242_880);
        assert!(!c.case_insensitive_suffixes);
        assert_eq!(c.request_timeout_secs, None);
        assert_eq!(c.parse_endpoint(), "http://localhost:8081/api/resumes/parse");
    }

    #[test]
    fn override_wins_only_when_non_empty() {
        assert_eq!(base_address_from(None), DEFAULT_BASE_ADDRESS);
        assert_eq!(base_address_from(Some(String::new())), DEFAULT_BASE_ADDRESS);
        assert_eq!(base_address_from(Some("  ".into())), DEFAULT_BASE_ADDRESS);
        assert_eq!(
            base_address_from(Some("https://api.example.com".into())),
            "https://api.example.com"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let c = ImportConfig::builder()
            .base_address("https://api.example.com/")
            .build()
            .unwrap();
        assert_eq!(
            c.parse_endpoint(),
            "https://api.example.com/api/resumes/parse"
        );
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        let err = ImportConfig::builder()
            .base_address("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ImportConfig::builder()
            .base_address("ftp://files.example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(ImportConfig::builder().request_timeout_secs(0).build().is_err());
        let c = ImportConfig::builder().request_timeout_secs(30).build().unwrap();
        assert_eq!(c.request_timeout_secs, Some(30));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let s = format!("{:?}", ImportConfig::default());
        assert!(s.contains("<dyn CredentialProvider>"));
        assert!(s.contains("localhost:8081"));
    }
}
