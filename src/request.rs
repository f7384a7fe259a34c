//! The file being imported.
//!
//! An [`ImportRequest`] carries what a file picker reports about a file
//! (name, declared MIME type, size) together with a handle to its bytes.
//! Requests are request-scoped: the pipeline borrows one for the duration of
//! an import and keeps nothing afterwards.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the bytes of an import come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read lazily when a strategy needs it.
    Path(PathBuf),
    /// Bytes already held in memory.
    Memory(Vec<u8>),
}

impl FileSource {
    /// Read the whole file into memory.
    pub async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// A user-selected file to import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// File name as displayed to the user, e.g. `resume.pdf`.
    pub name: String,
    /// Declared MIME type. May be empty or wrong.
    pub declared_type: String,
    /// Size in bytes, when known.
    pub size_bytes: Option<u64>,
    /// Handle to the file contents.
    pub source: FileSource,
}

impl ImportRequest {
    /// Build a request for a file on disk.
    ///
    /// The declared type is guessed from the extension the way a browser
    /// fills `File.type` (empty when the extension is unknown). The size is
    /// taken from file metadata and left unknown if that cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let declared_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        let size_bytes = tokio::fs::metadata(path).await.ok().map(|m| m.len());

        debug!(
            "Request for {}: type={:?} size={:?}",
            path.display(),
            declared_type,
            size_bytes
        );

        Self {
            name,
            declared_type,
            size_bytes,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// Build a request for an in-memory buffer. The size is the buffer length.
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size_bytes: Some(bytes.len() as u64),
            source: FileSource::Memory(bytes),
        }
    }

    /// Override the declared MIME type.
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = declared_type.into();
        self
    }

    /// Override the reported size (`None` = unknown).
    pub fn with_size(mut self, size_bytes: Option<u64>) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Read the file contents.
    pub async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        self.source.read_all().await
    }
}
