//! Input resolution: turn uploaded bytes, a local path, or a URL into a
//! validated in-memory [`Document`].
//!
//! pdfium can parse straight from a byte slice, so nothing is written to
//! disk: URL downloads and file reads both end up as a `Vec<u8>`. We check the
//! PDF magic bytes (`%PDF`) up front so callers get a meaningful error rather
//! than an opaque pdfium parse failure.

use crate::error::SummarizeError;
use std::path::PathBuf;
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// An uploaded document. Lives for one request and is dropped after
/// extraction.
#[derive(Clone)]
pub struct Document {
    bytes: Vec<u8>,
}

impl Document {
    /// Wrap raw upload bytes, rejecting anything without the `%PDF` header.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SummarizeError> {
        let bytes = bytes.into();
        if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
            return Err(SummarizeError::NotAPdf {
                magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
            });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("len", &self.bytes.len()).finish()
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a path or URL to a validated document.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Document, SummarizeError> {
    if input.trim().is_empty() {
        return Err(SummarizeError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, validating existence and PDF magic bytes.
async fn read_local(path_str: &str) -> Result<Document, SummarizeError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Err(match e.kind() {
                std::io::ErrorKind::NotFound => SummarizeError::FileNotFound { path },
                std::io::ErrorKind::PermissionDenied => SummarizeError::PermissionDenied { path },
                _ => SummarizeError::ReadFailed { path, source: e },
            });
        }
    };

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Document::from_bytes(bytes)
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Document, SummarizeError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SummarizeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummarizeError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Document::from_bytes(bytes.to_vec())
}
