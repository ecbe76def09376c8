//! GitHub effect interpreter using octocrab.
//!
//! This module implements the `GitHubInterpreter` trait, executing GitHub effects
//! against the real GitHub API via octocrab.
//!
//! Key implementation details:
//! - Discussions are only reachable through GraphQL, so every effect is a
//!   GraphQL query or mutation
//! - GraphQL `errors` arrays are surfaced as structured sub-errors
//! - Retry is opt-in per client (see [`OctocrabClient::with_max_retries`])

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::effects::{CommentData, DiscussionData, GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::types::{DiscussionNodeId, DiscussionNumber};

use super::client::OctocrabClient;
use super::error::{GitHubApiError, GraphQlErrorDetail};
use super::retry::{RetryConfig, RetryPolicy, retry_with_backoff};

// ─── GraphQL Documents ────────────────────────────────────────────────────────

const SEARCH_DISCUSSIONS_QUERY: &str = r#"
query($searchQuery: String!, $first: Int!) {
    search(query: $searchQuery, type: DISCUSSION, first: $first) {
        nodes {
            ... on Discussion {
                id
                number
                title
                url
            }
        }
    }
}
"#;

const CREATE_DISCUSSION_MUTATION: &str = r#"
mutation($input: CreateDiscussionInput!) {
    createDiscussion(input: $input) {
        discussion {
            id
            number
            title
            url
        }
    }
}
"#;

const ADD_DISCUSSION_COMMENT_MUTATION: &str = r#"
mutation($input: AddDiscussionCommentInput!) {
    addDiscussionComment(input: $input) {
        comment {
            id
            url
        }
    }
}
"#;

// ─── GraphQL Types ────────────────────────────────────────────────────────────

/// The standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Debug, Deserialize)]
struct SearchConnection {
    #[serde(default)]
    nodes: Vec<Option<RawDiscussion>>,
}

/// A discussion node. Search hits of other types come back as `{}`, so every
/// field is optional here and validated afterwards.
#[derive(Debug, Deserialize)]
struct RawDiscussion {
    id: Option<String>,
    number: Option<u64>,
    title: Option<String>,
    url: Option<String>,
}

impl RawDiscussion {
    fn into_data(self) -> Option<DiscussionData> {
        Some(DiscussionData {
            id: DiscussionNodeId(self.id?),
            number: DiscussionNumber(self.number?),
            title: self.title?,
            url: self.url,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDiscussionData {
    create_discussion: Option<CreatedDiscussion>,
}

#[derive(Debug, Deserialize)]
struct CreatedDiscussion {
    discussion: Option<RawDiscussion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCommentData {
    add_discussion_comment: Option<AddedComment>,
}

#[derive(Debug, Deserialize)]
struct AddedComment {
    comment: Option<CommentData>,
}

// ─── Interpreter Implementation ───────────────────────────────────────────────

impl GitHubInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        let (config, policy) = self.retry();
        interpret_github_effect(self, effect, config, policy).await
    }
}

/// Interprets a GitHub effect, executing it against the GitHub API.
///
/// This is the main entry point for effect interpretation. It handles retry
/// logic and proper error categorization.
pub async fn interpret_github_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
    retry_config: RetryConfig,
    retry_policy: RetryPolicy,
) -> Result<GitHubResponse, GitHubApiError> {
    tracing::debug!(effect = effect.name(), "Executing GitHub effect");
    let result = retry_with_backoff(retry_config, retry_policy, || {
        execute_effect(client, effect.clone())
    })
    .await;

    result.into_result()
}

/// Executes a single effect without retry logic.
async fn execute_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
) -> Result<GitHubResponse, GitHubApiError> {
    match effect {
        GitHubEffect::SearchDiscussions { title, first } => {
            search_discussions(client, &title, first).await
        }
        GitHubEffect::CreateDiscussion {
            repository_id,
            category_id,
            title,
            body,
        } => create_discussion(client, repository_id, category_id, title, body).await,
        GitHubEffect::AddDiscussionComment {
            discussion_id,
            body,
        } => add_discussion_comment(client, discussion_id, body).await,
    }
}

/// Posts a GraphQL document and unwraps the response envelope.
async fn run_graphql<T: DeserializeOwned>(
    client: &OctocrabClient,
    operation: &str,
    query: &str,
    variables: serde_json::Value,
) -> Result<T, GitHubApiError> {
    let envelope: GraphQlEnvelope<T> = client
        .inner()
        .graphql(&serde_json::json!({
            "query": query,
            "variables": variables,
        }))
        .await
        .map_err(GitHubApiError::from_octocrab)?;

    if !envelope.errors.is_empty() {
        return Err(GitHubApiError::from_graphql(operation, envelope.errors));
    }
    envelope.data.ok_or_else(|| {
        GitHubApiError::permanent_without_source(format!("{} returned no data", operation))
    })
}

/// Builds the search string that restricts a title search to our repository.
pub fn discussion_search_query(client: &OctocrabClient, title: &str) -> String {
    format!("repo:{} in:title \"{}\"", client.repo(), title)
}

// ─── Discussion Operations ────────────────────────────────────────────────────

async fn search_discussions(
    client: &OctocrabClient,
    title: &str,
    first: u32,
) -> Result<GitHubResponse, GitHubApiError> {
    let data: SearchData = run_graphql(
        client,
        "search",
        SEARCH_DISCUSSIONS_QUERY,
        serde_json::json!({
            "searchQuery": discussion_search_query(client, title),
            "first": first,
        }),
    )
    .await?;

    let discussions = data
        .search
        .nodes
        .into_iter()
        .flatten()
        .filter_map(RawDiscussion::into_data)
        .collect();
    Ok(GitHubResponse::Discussions(discussions))
}

async fn create_discussion(
    client: &OctocrabClient,
    repository_id: String,
    category_id: String,
    title: String,
    body: String,
) -> Result<GitHubResponse, GitHubApiError> {
    let data: CreateDiscussionData = run_graphql(
        client,
        "createDiscussion",
        CREATE_DISCUSSION_MUTATION,
        serde_json::json!({
            "input": {
                "repositoryId": repository_id,
                "categoryId": category_id,
                "title": title,
                "body": body,
            }
        }),
    )
    .await?;

    data.create_discussion
        .and_then(|c| c.discussion)
        .and_then(RawDiscussion::into_data)
        .map(GitHubResponse::DiscussionCreated)
        .ok_or_else(|| {
            GitHubApiError::permanent_without_source("createDiscussion returned no discussion")
        })
}

async fn add_discussion_comment(
    client: &OctocrabClient,
    discussion_id: DiscussionNodeId,
    body: String,
) -> Result<GitHubResponse, GitHubApiError> {
    let data: AddCommentData = run_graphql(
        client,
        "addDiscussionComment",
        ADD_DISCUSSION_COMMENT_MUTATION,
        serde_json::json!({
            "input": {
                "discussionId": discussion_id,
                "body": body,
            }
        }),
    )
    .await?;

    data.add_discussion_comment
        .and_then(|c| c.comment)
        .map(GitHubResponse::CommentPosted)
        .ok_or_else(|| {
            GitHubApiError::permanent_without_source("addDiscussionComment returned no comment")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoId;

    #[test]
    fn search_response_skips_non_discussion_nodes() {
        let json = r#"{
            "data": {
                "search": {
                    "nodes": [
                        {},
                        null,
                        { "id": "D_1", "number": 7, "title": "作者通知: alice", "url": "https://x/7" }
                    ]
                }
            }
        }"#;
        let envelope: GraphQlEnvelope<SearchData> = serde_json::from_str(json).unwrap();
        let found: Vec<_> = envelope
            .data
            .unwrap()
            .search
            .nodes
            .into_iter()
            .flatten()
            .filter_map(RawDiscussion::into_data)
            .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, DiscussionNodeId::new("D_1"));
        assert_eq!(found[0].number, DiscussionNumber(7));
    }

    #[test]
    fn envelope_carries_errors() {
        let json = r#"{
            "data": null,
            "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a node" }]
        }"#;
        let envelope: GraphQlEnvelope<AddCommentData> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].kind.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn add_comment_response_parses() {
        let json = r#"{
            "data": {
                "addDiscussionComment": {
                    "comment": { "id": "DC_1", "url": "https://x/7#discussioncomment-1" }
                }
            }
        }"#;
        let envelope: GraphQlEnvelope<AddCommentData> = serde_json::from_str(json).unwrap();
        let comment = envelope
            .data
            .unwrap()
            .add_discussion_comment
            .unwrap()
            .comment
            .unwrap();
        assert_eq!(comment.id, "DC_1");
    }

    #[tokio::test]
    async fn search_query_is_repo_scoped() {
        let client = OctocrabClient::from_token("t", RepoId::new("owner", "repo")).unwrap();
        assert_eq!(
            discussion_search_query(&client, "作者通知: alice"),
            "repo:owner/repo in:title \"作者通知: alice\""
        );
    }
}
