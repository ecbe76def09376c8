//! Inbound discussion comment events.
//!
//! The host automation writes a `discussion_comment` webhook payload to a file
//! and points us at it. Only a handful of fields matter, and any of them may be
//! missing; the payload is parsed leniently and then screened into a
//! [`NotificationTarget`] or a [`SkipReason`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::types::DiscussionNumber;

/// User type GitHub assigns to apps and bots.
const BOT_USER_TYPE: &str = "Bot";

/// Error type for event payload failures. Both are fatal for a run.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read event file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The parts of a discussion comment event the notifier reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotificationEvent {
    #[serde(default)]
    pub discussion: Option<EventDiscussion>,
    #[serde(default)]
    pub comment: Option<EventComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventDiscussion {
    /// Database ID (not the GraphQL node ID).
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub number: Option<u64>,
    /// The script path this discussion is about.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventComment {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<EventUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventUser {
    #[serde(default)]
    pub login: Option<String>,
    /// `User`, `Bot` or `Organization`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Why an event produced no notifications. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDiscussion,
    MissingComment,
    MissingCommenter,
    BotComment,
    /// The comment is on the notification hub discussion itself.
    HubDiscussion,
    EmptyTitle,
    /// The mapping could not be loaded.
    MappingUnavailable,
    /// No mapping entry for the discussion title.
    UnknownPath(String),
    /// The path is known but nobody is credited for it.
    NoAuthors(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDiscussion => write!(f, "event has no discussion"),
            SkipReason::MissingComment => write!(f, "event has no comment"),
            SkipReason::MissingCommenter => write!(f, "comment has no user"),
            SkipReason::BotComment => write!(f, "comment was written by a bot"),
            SkipReason::HubDiscussion => write!(f, "comment is on the notification hub"),
            SkipReason::EmptyTitle => write!(f, "discussion has no title"),
            SkipReason::MappingUnavailable => write!(f, "author mapping unavailable"),
            SkipReason::UnknownPath(path) => write!(f, "no authors recorded for {}", path),
            SkipReason::NoAuthors(path) => write!(f, "author list for {} is empty", path),
        }
    }
}

/// A screened event: everything needed to notify a script's authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    /// The discussion title, used verbatim as the mapping key.
    pub script_path: String,
    pub discussion_number: Option<DiscussionNumber>,
    pub discussion_url: String,
    /// Raw markdown of the comment.
    pub comment_body: String,
    pub commenter: String,
}

impl NotificationEvent {
    /// Checks the event in order and extracts its target.
    ///
    /// Comments on `hub_discussion_id` are never forwarded.
    pub fn screen(&self, hub_discussion_id: u64) -> Result<NotificationTarget, SkipReason> {
        let discussion = self
            .discussion
            .as_ref()
            .ok_or(SkipReason::MissingDiscussion)?;
        let comment = self.comment.as_ref().ok_or(SkipReason::MissingComment)?;
        let user = comment.user.as_ref().ok_or(SkipReason::MissingCommenter)?;

        if user.kind.as_deref() == Some(BOT_USER_TYPE) {
            return Err(SkipReason::BotComment);
        }
        if discussion.id == Some(hub_discussion_id) {
            return Err(SkipReason::HubDiscussion);
        }
        let script_path = match discussion.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return Err(SkipReason::EmptyTitle),
        };

        Ok(NotificationTarget {
            script_path,
            discussion_number: discussion.number.map(DiscussionNumber),
            discussion_url: discussion.html_url.clone().unwrap_or_default(),
            comment_body: comment.body.clone().unwrap_or_default(),
            commenter: user.login.clone().unwrap_or_default(),
        })
    }
}

/// Parses an event payload.
pub fn parse_event(payload: &[u8]) -> Result<NotificationEvent, EventError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Reads and parses the event file written by the host automation.
pub fn read_event(path: &Path) -> Result<NotificationEvent, EventError> {
    let bytes = std::fs::read(path).map_err(|source| EventError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_event(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB: u64 = 2;

    fn event(json: serde_json::Value) -> NotificationEvent {
        serde_json::from_value(json).unwrap()
    }

    fn full_event() -> serde_json::Value {
        serde_json::json!({
            "action": "created",
            "discussion": {
                "id": 99,
                "node_id": "D_kwDO",
                "number": 5,
                "title": "scripts/foo.js",
                "html_url": "https://x/5"
            },
            "comment": {
                "id": 1234,
                "body": "nice!",
                "user": { "login": "bob", "type": "User", "id": 7 }
            }
        })
    }

    #[test]
    fn screens_full_event_into_target() {
        let target = event(full_event()).screen(HUB).unwrap();
        assert_eq!(
            target,
            NotificationTarget {
                script_path: "scripts/foo.js".to_string(),
                discussion_number: Some(DiscussionNumber(5)),
                discussion_url: "https://x/5".to_string(),
                comment_body: "nice!".to_string(),
                commenter: "bob".to_string(),
            }
        );
    }

    #[test]
    fn missing_pieces_are_reported_in_order() {
        assert_eq!(
            event(serde_json::json!({})).screen(HUB),
            Err(SkipReason::MissingDiscussion)
        );

        let mut json = full_event();
        json["comment"] = serde_json::Value::Null;
        assert_eq!(event(json).screen(HUB), Err(SkipReason::MissingComment));

        let mut json = full_event();
        json["comment"]["user"] = serde_json::Value::Null;
        assert_eq!(event(json).screen(HUB), Err(SkipReason::MissingCommenter));
    }

    #[test]
    fn bot_comments_are_skipped() {
        let mut json = full_event();
        json["comment"]["user"]["type"] = "Bot".into();
        assert_eq!(event(json).screen(HUB), Err(SkipReason::BotComment));
    }

    #[test]
    fn hub_discussion_is_skipped() {
        let mut json = full_event();
        json["discussion"]["id"] = HUB.into();
        assert_eq!(event(json).screen(HUB), Err(SkipReason::HubDiscussion));
    }

    #[test]
    fn empty_or_missing_title_is_skipped() {
        let mut json = full_event();
        json["discussion"]["title"] = "".into();
        assert_eq!(event(json).screen(HUB), Err(SkipReason::EmptyTitle));

        let mut json = full_event();
        json["discussion"]
            .as_object_mut()
            .unwrap()
            .remove("title");
        assert_eq!(event(json).screen(HUB), Err(SkipReason::EmptyTitle));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(parse_event(b"{not json"), Err(EventError::Json(_))));
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_event(&dir.path().join("event.json")).unwrap_err();
        assert!(matches!(err, EventError::Read { .. }));
    }

    #[test]
    fn read_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, full_event().to_string()).unwrap();
        let parsed = read_event(&path).unwrap();
        assert_eq!(parsed.comment.unwrap().body.as_deref(), Some("nice!"));
    }
}
