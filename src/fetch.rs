//! Upstream repository index download.
//!
//! The script list publishes its whole content tree as a gzip-compressed
//! `repo.json.gz`. The fetcher downloads it, decompresses it and decodes the
//! tree; transient HTTP failures are retried with backoff.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::github::{RetryConfig, RetryPolicy, Retryable, retry_with_backoff};
use crate::types::RepoIndexDocument;

/// Timeout for a single download attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from fetching or decoding the upstream document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decompress repository index: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to decode repository index: {0}")]
    Json(#[from] serde_json::Error),
}

impl Retryable for FetchError {
    fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Decompress(_) | FetchError::Json(_) => false,
        }
    }
}

/// Downloads and decodes the upstream repository index.
pub async fn fetch_repo_index(url: &str) -> Result<RepoIndexDocument, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let bytes = retry_with_backoff(RetryConfig::DEFAULT, RetryPolicy::RetryTransient, || {
        download(&client, url)
    })
    .await
    .into_result()?;

    tracing::info!(bytes = bytes.len(), "Downloaded repository index");
    decode_repo_index(&bytes)
}

async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(request_error)?;
    Ok(body.to_vec())
}

/// Decompresses and decodes a gzip-compressed `repo.json`.
pub fn decode_repo_index(gzipped: &[u8]) -> Result<RepoIndexDocument, FetchError> {
    let mut json = Vec::new();
    GzDecoder::new(gzipped)
        .read_to_end(&mut json)
        .map_err(FetchError::Decompress)?;
    Ok(serde_json::from_slice(&json)?)
}
