//! GitHub API client and effect interpreter.
//!
//! This module provides the implementation for executing GitHub effects via the octocrab
//! library. It implements the `GitHubInterpreter` trait defined in the effects module.
//!
//! Key features:
//! - GraphQL queries and mutations for GitHub Discussions
//! - Distinguishes transient vs permanent errors, keeping GraphQL sub-errors
//! - Optional exponential backoff retry for transient failures

mod client;
mod error;
mod interpreter;
mod retry;

pub use client::OctocrabClient;
pub use error::{GitHubApiError, GitHubErrorKind, GraphQlErrorDetail};
pub use interpreter::{discussion_search_query, interpret_github_effect};
pub use retry::{RetryConfig, RetryPolicy, RetryResult, Retryable, retry_with_backoff};
