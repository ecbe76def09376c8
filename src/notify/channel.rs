//! Per-author notification channels.
//!
//! Each author has one discussion, titled with [`channel_title`], that collects
//! notifications about comments on their scripts. The title is the only key:
//! the resolver searches for it and creates the discussion when nothing
//! matches.
//!
//! # Races
//!
//! Search-then-create is not atomic. Two runs handling events for the same new
//! author at the same time can both miss in search and both create a channel.
//! Later runs then pick whichever one search returns first.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::types::{AuthorLogin, DiscussionNodeId};

use super::format::{channel_body, channel_title};

/// Fixed identifiers for creating channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    /// GraphQL node ID of the repository hosting the channels.
    pub repository_id: String,

    /// GraphQL node ID of the discussion category new channels go in.
    pub category_id: String,

    /// How many search results to inspect.
    pub search_page_size: u32,
}

/// Why a channel could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{effect} failed: {message}")]
    Api {
        effect: &'static str,
        message: String,
    },

    #[error("unexpected response to {effect}")]
    UnexpectedResponse { effect: &'static str },
}

impl ResolveError {
    fn api(effect: &GitHubEffect, err: impl fmt::Display) -> Self {
        ResolveError::Api {
            effect: effect.name(),
            message: err.to_string(),
        }
    }
}

/// Finds or creates author channels through a [`GitHubInterpreter`].
pub struct ChannelResolver<'a, G> {
    github: &'a G,
    settings: &'a ChannelSettings,
}

impl<'a, G> ChannelResolver<'a, G>
where
    G: GitHubInterpreter,
    G::Error: fmt::Display,
{
    pub fn new(github: &'a G, settings: &'a ChannelSettings) -> Self {
        Self { github, settings }
    }

    /// Returns the author's channel, creating it if needed.
    ///
    /// Failures are logged and reported as `None`; the caller should skip the
    /// author rather than abort.
    pub async fn resolve(&self, author: &AuthorLogin) -> Option<DiscussionNodeId> {
        match self.get_or_create(author).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(author = %author, error = %e, "Failed to get or create author channel");
                None
            }
        }
    }

    /// Search-then-create. The first search hit with an exactly matching
    /// title wins.
    pub async fn get_or_create(
        &self,
        author: &AuthorLogin,
    ) -> Result<DiscussionNodeId, ResolveError> {
        let title = channel_title(author);

        let search = GitHubEffect::SearchDiscussions {
            title: title.clone(),
            first: self.settings.search_page_size,
        };
        let found = match self.github.interpret(search.clone()).await {
            Ok(GitHubResponse::Discussions(found)) => found,
            Ok(_) => {
                return Err(ResolveError::UnexpectedResponse {
                    effect: search.name(),
                });
            }
            Err(e) => return Err(ResolveError::api(&search, e)),
        };

        if let Some(existing) = found.into_iter().find(|d| d.title == title) {
            info!(
                author = %author,
                discussion = %existing.number,
                "Found existing author channel"
            );
            return Ok(existing.id);
        }

        info!(author = %author, "Creating author channel");
        let create = GitHubEffect::CreateDiscussion {
            repository_id: self.settings.repository_id.clone(),
            category_id: self.settings.category_id.clone(),
            title,
            body: channel_body(author),
        };
        match self.github.interpret(create.clone()).await {
            Ok(GitHubResponse::DiscussionCreated(created)) => {
                info!(
                    author = %author,
                    discussion = %created.number,
                    url = created.url.as_deref().unwrap_or_default(),
                    "Created author channel"
                );
                Ok(created.id)
            }
            Ok(_) => Err(ResolveError::UnexpectedResponse {
                effect: create.name(),
            }),
            Err(e) => Err(ResolveError::api(&create, e)),
        }
    }
}
