//! Remote parse service client.
//!
//! Uploads the raw file as multipart field `file` to
//! `POST {base}/api/resumes/parse`, with `Authorization: Bearer …` only when
//! a credential resolved. A 2xx answer carries JSON with `rawText` (plus the
//! service's `skills`/`experiences` lists, which library callers may use).
//! Nothing here retries.

use crate::config::ImportConfig;
use crate::credentials::resolve_credential;
use crate::error::RemoteParseError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Body of a successful parse response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    /// Full extracted text. Absent or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experiences: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    /// Sent as the part's content type when non-empty.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Client for the remote parse service.
#[derive(Clone)]
pub struct RemoteParseClient {
    client: reqwest::Client,
    config: ImportConfig,
}

impl RemoteParseClient {
    pub fn new(config: ImportConfig) -> Result<Self, RemoteParseError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| RemoteParseError::Transport {
            reason: format!("could not build HTTP client: {e}"),
        })?;
        Ok(Self { client, config })
    }

    /// Upload `upload` and return the parsed response.
    pub async fn parse(&self, upload: Upload) -> Result<ParsedResume, RemoteParseError> {
        let endpoint = self.config.parse_endpoint();
        info!(
            "Uploading '{}' ({} bytes) to {}",
            upload.file_name,
            upload.bytes.len(),
            endpoint
        );

        let mut part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = part_content_type(&upload.content_type) {
            part = part
                .mime_str(mime.as_ref())
                .map_err(|e| RemoteParseError::Transport {
                    reason: format!("invalid content type '{}': {}", mime, e),
                })?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(&endpoint).multipart(form);
        if let Some(token) = resolve_credential(self.config.credentials.as_ref()) {
            request = request.bearer_auth(token);
        } else {
            debug!("No stored credential; uploading unauthenticated");
        }

        let response = request.send().await.map_err(|e| {
            warn!("Upload to {} failed: {}", endpoint, e);
            RemoteParseError::Transport {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                warn!("Reading rejection body from {} failed: {}", endpoint, e);
                RemoteParseError::Transport {
                    reason: e.to_string(),
                }
            })?;
            let detail = if body.is_empty() {
                status.as_u16().to_string()
            } else {
                body
            };
            warn!("Parse service rejected upload ({}): {}", status, detail);
            return Err(RemoteParseError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await.map_err(|e| RemoteParseError::Transport {
            reason: e.to_string(),
        })?;
        let parsed: ParsedResume =
            serde_json::from_slice(&body).map_err(|e| RemoteParseError::MalformedResponse {
                reason: e.to_string(),
            })?;

        debug!(
            "Parse service returned {} chars, {} skills, {} experiences",
            parsed.raw_text.len(),
            parsed.skills.len(),
            parsed.experiences.len()
        );
        Ok(parsed)
    }
}

/// The declared type, when it is a usable MIME type. Anything else is sent
/// without a part content type.
fn part_content_type(declared: &str) -> Option<mime_guess::mime::Mime> {
    if declared.is_empty() {
        return None;
    }
    match declared.parse::<mime_guess::mime::Mime>() {
        Ok(mime) => Some(mime),
        Err(e) => {
            debug!("Ignoring declared type '{}': {}", declared, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn parsed_resume_reads_camel_case() {
        let p: ParsedResume = serde_json::from_str(
            r#"{"rawText":"Bob Smith","skills":["Rust"],"experiences":[]}"#,
        )
        .unwrap();
        assert_eq!(p.raw_text, "Bob Smith");
        assert_eq!(p.skills, vec!["Rust"]);
    }

    #[test]
    fn missing_or_null_fields_default_to_empty() {
        let p: ParsedResume = serde_json::from_str("{}").unwrap();
        assert_eq!(p, ParsedResume::default());

        let p: ParsedResume =
            serde_json::from_str(r#"{"rawText":null,"skills":null}"#).unwrap();
        assert_eq!(p.raw_text, "");
        assert!(p.skills.is_empty());
    }

    #[test]
    fn non_object_body_is_an_error() {
        assert!(serde_json::from_str::<ParsedResume>("\"text\"").is_err());
        assert!(serde_json::from_str::<ParsedResume>("not json").is_err());
    }

    #[test]
    fn declared_type_must_parse_to_be_sent() {
        assert_eq!(
            part_content_type("application/pdf").map(|m| m.essence_str().to_string()),
            Some("application/pdf".to_string())
        );
        assert!(part_content_type("").is_none());
        assert!(part_content_type("pdf").is_none());
    }

    /// Serve one connection: a 500 that promises more body than it sends.
    async fn truncated_rejection_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request up to the closing multipart boundary.
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request.ends_with(b"--\r\n") && !request.ends_with(b"0\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nshort")
                .await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn unreadable_rejection_body_is_transport_failure() {
        let base = truncated_rejection_server().await;
        let config = ImportConfig::builder().base_address(base).build().unwrap();
        let client = RemoteParseClient::new(config).unwrap();

        let err = client
            .parse(Upload {
                file_name: "resume.pdf".into(),
                content_type: String::new(),
                bytes: b"%PDF".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err, RemoteParseError::Transport { .. }),
            "got {err:?}"
        );
    }
}
