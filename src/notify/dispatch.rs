//! Fan-out of one comment event to every author of the commented script.
//!
//! Authors are notified one at a time, in mapping order, with a fixed pause
//! after each post to stay under GitHub's secondary rate limits. A failure for
//! one author is logged and the loop moves on to the next; nothing here aborts
//! the run.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::types::{AuthorLogin, AuthorMapping};

use super::channel::{ChannelResolver, ChannelSettings};
use super::event::{NotificationEvent, NotificationTarget, SkipReason};
use super::format::notification_body;

/// Runtime settings for the dispatcher, validated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySettings {
    /// Database ID of the hub discussion whose comments are never forwarded.
    pub hub_discussion_id: u64,

    /// Pause between consecutive authors.
    pub pacing: Duration,

    pub channel: ChannelSettings,
}

/// What a dispatch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Set when the event was dropped before fan-out.
    pub skipped: Option<SkipReason>,

    /// Authors whose notification was posted.
    pub notified: Vec<AuthorLogin>,

    /// Authors whose channel could not be resolved or whose post failed.
    pub failed: Vec<AuthorLogin>,
}

impl DispatchReport {
    pub fn skipped(reason: SkipReason) -> Self {
        DispatchReport {
            skipped: Some(reason),
            ..Default::default()
        }
    }
}

/// Drives notification fan-out for one event.
pub struct Dispatcher<'a, G> {
    github: &'a G,
    settings: &'a NotifySettings,
}

impl<'a, G> Dispatcher<'a, G>
where
    G: GitHubInterpreter,
    G::Error: fmt::Display,
{
    pub fn new(github: &'a G, settings: &'a NotifySettings) -> Self {
        Self { github, settings }
    }

    /// Screens `event`, looks up the script's authors and notifies each one.
    pub async fn dispatch(&self, event: &NotificationEvent, mapping: &AuthorMapping) -> DispatchReport {
        let target = match event.screen(self.settings.hub_discussion_id) {
            Ok(target) => target,
            Err(reason) => {
                info!(%reason, "Skipping event");
                return DispatchReport::skipped(reason);
            }
        };

        let entry = match mapping.find(&target.script_path) {
            Some(entry) if !entry.author_links.is_empty() => entry,
            Some(_) => {
                let reason = SkipReason::NoAuthors(target.script_path.clone());
                info!(%reason, "Skipping event");
                return DispatchReport::skipped(reason);
            }
            None => {
                let reason = SkipReason::UnknownPath(target.script_path.clone());
                info!(%reason, "Skipping event");
                return DispatchReport::skipped(reason);
            }
        };

        let authors: Vec<AuthorLogin> = entry
            .author_links
            .iter()
            .filter_map(|link| {
                let login = AuthorLogin::from_link(link);
                if login.is_none() {
                    warn!(link = %link, "Author link has no login segment, skipping");
                }
                login
            })
            .collect();

        info!(
            path = %target.script_path,
            authors = authors.len(),
            commenter = %target.commenter,
            "Notifying script authors"
        );
        self.fan_out(&target, authors).await
    }

    async fn fan_out(&self, target: &NotificationTarget, authors: Vec<AuthorLogin>) -> DispatchReport {
        let resolver = ChannelResolver::new(self.github, &self.settings.channel);
        let mut report = DispatchReport::default();
        let total = authors.len();

        for (i, author) in authors.into_iter().enumerate() {
            let Some(channel) = resolver.resolve(&author).await else {
                warn!(author = %author, "No channel for author, skipping");
                report.failed.push(author);
                continue;
            };

            let effect = GitHubEffect::AddDiscussionComment {
                discussion_id: channel,
                body: notification_body(&author, target),
            };
            match self.github.interpret(effect).await {
                Ok(GitHubResponse::CommentPosted(comment)) => {
                    info!(author = %author, url = %comment.url, "Notification posted");
                    report.notified.push(author);
                }
                Ok(other) => {
                    warn!(author = %author, response = ?other, "Unexpected response to notification post");
                    report.failed.push(author);
                }
                Err(e) => {
                    warn!(author = %author, error = %e, "Failed to post notification");
                    report.failed.push(author);
                }
            }

            if i + 1 < total {
                tokio::time::sleep(self.settings.pacing).await;
            }
        }

        info!(
            notified = report.notified.len(),
            failed = report.failed.len(),
            "Notification fan-out finished"
        );
        report
    }
}
