//! Effects-as-data for GitHub Discussions operations.
//!
//! This module defines effect types that describe operations without executing them.
//! This enables:
//! - Pure notification logic that speaks in effects
//! - Testability via recording mock interpreters
//! - Logging/tracing of intended operations
//!
//! The octocrab-backed interpreter lives in [`crate::github`].

pub mod github;
pub mod interpreter;

pub use github::{CommentData, DiscussionData, GitHubEffect, GitHubResponse};
pub use interpreter::GitHubInterpreter;
