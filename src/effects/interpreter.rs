//! Effect interpreter trait.
//!
//! The trait-based design enables:
//! - The octocrab interpreter for real API calls
//! - Mock interpreters for testing the resolver and dispatcher

use std::future::Future;

use super::github::{GitHubEffect, GitHubResponse};

/// Interprets GitHub effects against the GitHub API.
///
/// Implementations are constructed with a `RepoId`, so all effects executed
/// through a single interpreter instance are scoped to that repository.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockGitHubInterpreter {
///     response: GitHubResponse,
/// }
///
/// impl GitHubInterpreter for MockGitHubInterpreter {
///     type Error = String;
///
///     async fn interpret(&self, _effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait GitHubInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a GitHub effect and return its response.
    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send;
}
