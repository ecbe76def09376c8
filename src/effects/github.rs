//! GitHub Discussions effect types.
//!
//! These types describe the API operations the notifier needs, as data. The
//! interpreter in [`crate::github`] executes them over GraphQL.

use serde::{Deserialize, Serialize};

use crate::types::{DiscussionNodeId, DiscussionNumber};

/// A GitHub API effect.
///
/// Effects are repo-scoped: the interpreter is constructed with a `RepoId`, so
/// search effects don't carry it. Creation needs GraphQL node IDs, which the
/// caller supplies from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    /// Search the repository's discussions by title.
    ///
    /// GitHub's search is fuzzy; callers must check titles themselves.
    SearchDiscussions {
        title: String,
        /// Maximum number of results to return.
        first: u32,
    },

    /// Create a new discussion.
    CreateDiscussion {
        repository_id: String,
        category_id: String,
        title: String,
        body: String,
    },

    /// Add a top-level comment to a discussion.
    AddDiscussionComment {
        discussion_id: DiscussionNodeId,
        body: String,
    },
}

impl GitHubEffect {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GitHubEffect::SearchDiscussions { .. } => "search_discussions",
            GitHubEffect::CreateDiscussion { .. } => "create_discussion",
            GitHubEffect::AddDiscussionComment { .. } => "add_discussion_comment",
        }
    }
}

// ─── Response Types ───────────────────────────────────────────────────────────

/// Discussion data returned from the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionData {
    pub id: DiscussionNodeId,
    pub number: DiscussionNumber,
    pub title: String,
    /// Web URL, when the API returned one.
    pub url: Option<String>,
}

/// Data for a newly posted comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub url: String,
}

/// Response from a GitHub effect.
///
/// Each variant corresponds to the response from a particular effect type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GitHubResponse {
    /// Response to `SearchDiscussions`, in the order GitHub ranked them.
    Discussions(Vec<DiscussionData>),

    /// Response to `CreateDiscussion`.
    DiscussionCreated(DiscussionData),

    /// Response to `AddDiscussionComment`.
    CommentPosted(CommentData),
}
