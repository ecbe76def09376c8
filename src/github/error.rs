//! GitHub API error types.
//!
//! Errors are categorized so callers can decide what to do with them:
//!
//! - **Transient** errors are retriable (5xx, rate limits, network failures)
//! - **Permanent** errors will fail again if repeated (most 4xx, bad input,
//!   GraphQL validation errors)
//!
//! GraphQL reports most failures inside an HTTP 200 response as an `errors`
//! array. Those entries are kept on the error as [`GraphQlErrorDetail`]s so they
//! can be logged alongside the top-level message.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::retry::Retryable;

/// The kind of GitHub API error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// Transient error - safe to retry with backoff.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429, or 403 carrying a rate limit / abuse detection message
    /// - GraphQL `RATE_LIMITED` errors
    /// - Network timeouts
    Transient,

    /// Permanent error - retrying will not help.
    ///
    /// Examples:
    /// - HTTP 4xx (except rate limits)
    /// - Authentication failures (401, 403 non-rate-limit)
    /// - GraphQL `NOT_FOUND`, `FORBIDDEN` or schema errors
    /// - A response missing the data we asked for
    Permanent,
}

impl GitHubErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GitHubErrorKind::Transient)
    }
}

/// One entry of a GraphQL `errors` array (or a REST `errors` entry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlErrorDetail {
    /// Machine-readable error type, e.g. `NOT_FOUND` or `RATE_LIMITED`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub message: String,
}

impl fmt::Display for GraphQlErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{}: {}", kind, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A GitHub API error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    /// The kind of error (transient or permanent).
    pub kind: GitHubErrorKind,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// Structured sub-errors reported by the API.
    pub details: Vec<GraphQlErrorDetail>,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message)?,
            None => write!(f, "GitHub API error: {}", self.message)?,
        }
        if !self.details.is_empty() {
            let joined: Vec<String> = self.details.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", joined.join("; "))?;
        }
        Ok(())
    }
}

impl Retryable for GitHubApiError {
    fn is_transient(&self) -> bool {
        self.kind.is_retriable()
    }
}

impl GitHubApiError {
    /// Creates a permanent error without an octocrab source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            details: Vec::new(),
            source: None,
        }
    }

    /// Creates a transient error without an octocrab source.
    pub fn transient_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Transient,
            status_code: None,
            message: message.into(),
            details: Vec::new(),
            source: None,
        }
    }

    /// Builds an error from the `errors` array of a GraphQL response.
    ///
    /// The error is transient only if GitHub says we were rate limited.
    pub fn from_graphql(operation: &str, details: Vec<GraphQlErrorDetail>) -> Self {
        let rate_limited = details
            .iter()
            .any(|d| d.kind.as_deref() == Some("RATE_LIMITED") || is_rate_limit_error(&d.message));
        Self {
            kind: if rate_limited {
                GitHubErrorKind::Transient
            } else {
                GitHubErrorKind::Permanent
            },
            status_code: None,
            message: format!("{} returned GraphQL errors", operation),
            details,
            source: None,
        }
    }

    /// Categorizes an octocrab error.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let (status_code, details) = match &err {
            octocrab::Error::GitHub { source, .. } => (
                Some(source.status_code.as_u16()),
                source
                    .errors
                    .iter()
                    .flatten()
                    .map(detail_from_value)
                    .collect(),
            ),
            _ => (None, Vec::new()),
        };
        let message = err.to_string();

        let kind = match status_code {
            Some(429) => GitHubErrorKind::Transient,
            Some(403) if is_rate_limit_error(&message) => GitHubErrorKind::Transient,
            Some(code) if (500..600).contains(&code) => GitHubErrorKind::Transient,
            Some(_) => GitHubErrorKind::Permanent,
            None if is_network_error(&message) => GitHubErrorKind::Transient,
            None => GitHubErrorKind::Permanent,
        };

        Self {
            kind,
            status_code,
            message,
            details,
            source: Some(err),
        }
    }
}

/// REST error entries are loosely shaped; keep what's recognizable.
fn detail_from_value(value: &serde_json::Value) -> GraphQlErrorDetail {
    serde_json::from_value(value.clone()).unwrap_or_else(|_| GraphQlErrorDetail {
        kind: None,
        message: value.to_string(),
    })
}

/// Checks if an error message indicates a rate limit.
fn is_rate_limit_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("rate limit")
        || message_lower.contains("api rate")
        || message_lower.contains("secondary rate")
        || message_lower.contains("abuse detection")
}

/// Checks if an error message indicates a network-level error.
fn is_network_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("timeout")
        || message_lower.contains("connection")
        || message_lower.contains("network")
        || message_lower.contains("dns")
        || message_lower.contains("timed out")
}
