//! Octocrab client wrapper scoped to a specific repository.
//!
//! `OctocrabClient` wraps an `Octocrab` instance and scopes all operations to
//! the repository that hosts the notification discussions. Effects therefore
//! don't carry repository info.

use octocrab::Octocrab;

use crate::types::RepoId;

use super::retry::{RetryConfig, RetryPolicy};

/// A GitHub API client scoped to a specific repository.
#[derive(Clone)]
pub struct OctocrabClient {
    /// The underlying octocrab client.
    client: Octocrab,

    /// The repository this client is scoped to.
    repo: RepoId,

    /// How many times transient failures are retried. Zero disables retry.
    max_retries: u32,
}

impl OctocrabClient {
    /// Creates a new client scoped to the given repository.
    pub fn new(client: Octocrab, repo: RepoId) -> Self {
        Self {
            client,
            repo,
            max_retries: 0,
        }
    }

    /// Creates a client from a GitHub token.
    pub fn from_token(token: impl Into<String>, repo: RepoId) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client, repo))
    }

    /// Enables retry of transient failures, up to `max_retries` extra attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    /// Returns the repository this client is scoped to.
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Returns the retry schedule and policy this client runs effects with.
    pub fn retry(&self) -> (RetryConfig, RetryPolicy) {
        if self.max_retries == 0 {
            (RetryConfig::DEFAULT, RetryPolicy::NoRetry)
        } else {
            (
                RetryConfig::with_max_retries(self.max_retries),
                RetryPolicy::RetryTransient,
            )
        }
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("repo", &self.repo)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
