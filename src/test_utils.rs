//! Shared test utilities and arbitrary generators for property-based testing.

use std::sync::Mutex;

use crate::effects::{CommentData, DiscussionData, GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::notify::ChannelSettings;
use crate::notify::format::channel_title;
use crate::types::{
    AuthorLogin, AuthorRef, DiscussionNodeId, DiscussionNumber, NodeKind, TreeNode,
};
use proptest::prelude::*;

/// Author links, including blank ones the builder must discard.
pub fn arb_link() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-e]".prop_map(|user| format!("https://github.com/{user}")),
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
    ]
}

pub fn arb_authors() -> impl Strategy<Value = Option<Vec<AuthorRef>>> {
    prop::option::of(prop::collection::vec(
        arb_link().prop_map(AuthorRef::new),
        0..3,
    ))
}

/// An unnamed node; names are assigned by the parent so siblings never collide.
pub fn arb_node() -> impl Strategy<Value = TreeNode> {
    let leaf = arb_authors().prop_map(|authors| TreeNode {
        name: None,
        kind: NodeKind::File,
        authors,
        children: Vec::new(),
    });

    leaf.prop_recursive(4, 48, 4, |inner| {
        (arb_authors(), prop::collection::vec(inner, 0..4)).prop_map(|(authors, children)| {
            TreeNode {
                name: None,
                kind: NodeKind::Directory,
                authors,
                children: with_unique_names(children),
            }
        })
    })
}

/// A forest of root nodes. The first root is sometimes the designated subtree.
pub fn arb_tree() -> impl Strategy<Value = Vec<TreeNode>> {
    (prop::collection::vec(arb_node(), 0..4), any::<bool>()).prop_map(|(roots, pathing_first)| {
        let mut roots = with_unique_names(roots);
        if pathing_first {
            if let Some(first) = roots.first_mut() {
                first.name = Some(crate::index::DESIGNATED_SUBTREE.to_string());
            }
        }
        roots
    })
}

fn with_unique_names(nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, mut node)| {
            node.name = Some(format!("n{i}"));
            node
        })
        .collect()
}

// ─── Fake GitHub ──────────────────────────────────────────────────────────────

/// Channel settings used across notifier tests.
pub fn channel_settings() -> ChannelSettings {
    ChannelSettings {
        repository_id: "R_test".to_string(),
        category_id: "DIC_test".to_string(),
        search_page_size: 10,
    }
}

/// In-memory discussions backend that records every effect it is given.
///
/// Search behaves like GitHub's fuzzy title search: any channel whose title
/// starts with the searched title is returned.
#[derive(Default)]
pub struct FakeGitHub {
    effects: Mutex<Vec<GitHubEffect>>,
    discussions: Mutex<Vec<DiscussionData>>,
    failing_search: Vec<String>,
    failing_create: bool,
    failing_posts: Vec<DiscussionNodeId>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing channel for `login`.
    pub fn with_channel(self, login: &str, id: &str) -> Self {
        {
            let mut discussions = self.discussions.lock().unwrap();
            let number = DiscussionNumber(discussions.len() as u64 + 100);
            discussions.push(DiscussionData {
                id: DiscussionNodeId::new(id),
                number,
                title: channel_title(&AuthorLogin::new(login)),
                url: Some(format!("https://github.com/o/r/discussions/{}", number.0)),
            });
        }
        self
    }

    /// Makes the channel search for `login` fail.
    pub fn failing_search_for(mut self, login: &str) -> Self {
        self.failing_search
            .push(channel_title(&AuthorLogin::new(login)));
        self
    }

    /// Makes every channel creation fail.
    pub fn failing_create(mut self) -> Self {
        self.failing_create = true;
        self
    }

    /// Makes posting to the given channel fail.
    pub fn failing_post_to(mut self, id: &str) -> Self {
        self.failing_posts.push(DiscussionNodeId::new(id));
        self
    }

    pub fn effects(&self) -> Vec<GitHubEffect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                GitHubEffect::CreateDiscussion { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    /// Every attempted post as (channel, body), including failed ones.
    pub fn posts(&self) -> Vec<(DiscussionNodeId, String)> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                GitHubEffect::AddDiscussionComment {
                    discussion_id,
                    body,
                } => Some((discussion_id, body)),
                _ => None,
            })
            .collect()
    }

    fn respond(&self, effect: &GitHubEffect) -> Result<GitHubResponse, String> {
        match effect {
            GitHubEffect::SearchDiscussions { title, first } => {
                if self.failing_search.contains(title) {
                    return Err("search: connection reset".to_string());
                }
                let found = self
                    .discussions
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|d| d.title.starts_with(title.as_str()))
                    .take(*first as usize)
                    .cloned()
                    .collect();
                Ok(GitHubResponse::Discussions(found))
            }
            GitHubEffect::CreateDiscussion { title, .. } => {
                if self.failing_create {
                    return Err("createDiscussion: FORBIDDEN".to_string());
                }
                let mut discussions = self.discussions.lock().unwrap();
                let number = DiscussionNumber(discussions.len() as u64 + 100);
                let created = DiscussionData {
                    id: DiscussionNodeId::new(format!("D_created_{}", number.0)),
                    number,
                    title: title.clone(),
                    url: Some(format!("https://github.com/o/r/discussions/{}", number.0)),
                };
                discussions.push(created.clone());
                Ok(GitHubResponse::DiscussionCreated(created))
            }
            GitHubEffect::AddDiscussionComment { discussion_id, .. } => {
                if self.failing_posts.contains(discussion_id) {
                    return Err("addDiscussionComment: NOT_FOUND".to_string());
                }
                let n = self.effects.lock().unwrap().len();
                Ok(GitHubResponse::CommentPosted(CommentData {
                    id: format!("DC_{}", n),
                    url: format!("https://github.com/o/r/discussions/1#discussioncomment-{}", n),
                }))
            }
        }
    }
}

impl GitHubInterpreter for FakeGitHub {
    type Error = String;

    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl std::future::Future<Output = Result<GitHubResponse, Self::Error>> + Send {
        let result = self.respond(&effect);
        self.effects.lock().unwrap().push(effect);
        async move { result }
    }
}
