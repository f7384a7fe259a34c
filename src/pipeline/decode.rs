//! Plain-text strategy: read the file and decode it as UTF-8.

use crate::error::ImportError;
use crate::request::ImportRequest;
use tracing::debug;

/// Read and decode a plain-text file. Invalid UTF-8 sequences become
/// U+FFFD rather than failing the import; only a failed read is an error.
pub async fn decode_text(request: &ImportRequest) -> Result<String, ImportError> {
    let bytes = request
        .read_all()
        .await
        .map_err(|source| ImportError::LocalRead { source })?;
    debug!("Decoding {} bytes from '{}'", bytes.len(), request.name);
    Ok(decode_bytes(&bytes))
}

/// Decode bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decodes_memory_source() {
        let req = ImportRequest::from_bytes("resume.txt", "text/plain", b"Hi".to_vec());
        assert_eq!(decode_text(&req).await.unwrap(), "Hi");
    }

    #[tokio::test]
    async fn unreadable_file_is_local_read_error() {
        let req = ImportRequest::from_path("/no/such/dir/resume.txt").await;
        let err = decode_text(&req).await.unwrap_err();
        assert!(matches!(err, ImportError::LocalRead { .. }));
        assert_eq!(err.to_string(), "Failed to read file");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_bytes(b"caf\xE9"), "caf\u{FFFD}");
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(decode_bytes(b"\xEF\xBB\xBFHello"), "Hello");
        assert_eq!(decode_bytes(b""), "");
    }
}
