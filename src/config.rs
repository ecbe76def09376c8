//! Process configuration.
//!
//! All settings come from environment variables and are read exactly once at
//! startup into a [`Config`], which is then passed by reference. Everything
//! except the credential and the event path has a default matching the
//! production deployment.
//!
//! | Variable | Default |
//! |---|---|
//! | `GITHUB_TOKEN` | required by `notify` |
//! | `GITHUB_EVENT_PATH` | required by `notify` unless `--event` is given |
//! | `AUTHOR_NOTIFY_REPO` | `babalae/bettergi-script-web-giscus` |
//! | `AUTHOR_NOTIFY_REPOSITORY_ID` | `R_kgDOPbW19A` |
//! | `AUTHOR_NOTIFY_CATEGORY_ID` | `DIC_kwDOPbW19M4Ct_3t` |
//! | `AUTHOR_NOTIFY_HUB_DISCUSSION_ID` | `2` |
//! | `AUTHOR_NOTIFY_MAPPING_PATH` | `assets/author_mapping.json` |
//! | `AUTHOR_NOTIFY_SOURCE_URL` | the script list's release `repo.json.gz` |
//! | `AUTHOR_NOTIFY_PACING_MS` | `1000` |
//! | `AUTHOR_NOTIFY_SEARCH_PAGE_SIZE` | `10` |
//! | `AUTHOR_NOTIFY_GITHUB_RETRIES` | `0` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::notify::{ChannelSettings, NotifySettings};
use crate::types::RepoId;

const DEFAULT_REPO_OWNER: &str = "babalae";
const DEFAULT_REPO_NAME: &str = "bettergi-script-web-giscus";
const DEFAULT_REPOSITORY_ID: &str = "R_kgDOPbW19A";
const DEFAULT_CATEGORY_ID: &str = "DIC_kwDOPbW19M4Ct_3t";
const DEFAULT_HUB_DISCUSSION_ID: u64 = 2;
const DEFAULT_MAPPING_PATH: &str = "assets/author_mapping.json";
const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/babalae/bettergi-scripts-list/refs/heads/release/repo.json.gz";
const DEFAULT_PACING_MS: u64 = 1000;
const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// The GitHub credential. Never printed.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: Option<Token>,
    pub event_path: Option<PathBuf>,
    /// Repository hosting the author channels.
    pub repo: RepoId,
    pub mapping_path: PathBuf,
    pub source_url: String,
    /// Extra attempts for transient GitHub API failures.
    pub github_retries: u32,
    pub notify: NotifySettings,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value
    /// if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let repo = parse_or("AUTHOR_NOTIFY_REPO", get("AUTHOR_NOTIFY_REPO"), || {
            RepoId::new(DEFAULT_REPO_OWNER, DEFAULT_REPO_NAME)
        })?;
        let pacing_ms = parse_or(
            "AUTHOR_NOTIFY_PACING_MS",
            get("AUTHOR_NOTIFY_PACING_MS"),
            || DEFAULT_PACING_MS,
        )?;
        let hub_discussion_id = parse_or(
            "AUTHOR_NOTIFY_HUB_DISCUSSION_ID",
            get("AUTHOR_NOTIFY_HUB_DISCUSSION_ID"),
            || DEFAULT_HUB_DISCUSSION_ID,
        )?;
        let search_page_size: u32 = parse_or(
            "AUTHOR_NOTIFY_SEARCH_PAGE_SIZE",
            get("AUTHOR_NOTIFY_SEARCH_PAGE_SIZE"),
            || DEFAULT_SEARCH_PAGE_SIZE,
        )?;
        if search_page_size == 0 || search_page_size > 100 {
            return Err(ConfigError::InvalidValue {
                var: "AUTHOR_NOTIFY_SEARCH_PAGE_SIZE",
                value: search_page_size.to_string(),
            });
        }
        let github_retries = parse_or(
            "AUTHOR_NOTIFY_GITHUB_RETRIES",
            get("AUTHOR_NOTIFY_GITHUB_RETRIES"),
            || 0,
        )?;

        Ok(Config {
            token: get("GITHUB_TOKEN").map(Token),
            event_path: get("GITHUB_EVENT_PATH").map(PathBuf::from),
            repo,
            mapping_path: get("AUTHOR_NOTIFY_MAPPING_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_PATH)),
            source_url: get("AUTHOR_NOTIFY_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            github_retries,
            notify: NotifySettings {
                hub_discussion_id,
                pacing: Duration::from_millis(pacing_ms),
                channel: ChannelSettings {
                    repository_id: get("AUTHOR_NOTIFY_REPOSITORY_ID")
                        .unwrap_or_else(|| DEFAULT_REPOSITORY_ID.to_string()),
                    category_id: get("AUTHOR_NOTIFY_CATEGORY_ID")
                        .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
                    search_page_size,
                },
            },
        })
    }

    /// Returns the credential, or the fatal error for its absence.
    pub fn require_token(&self) -> Result<&Token, ConfigError> {
        self.token.as_ref().ok_or(ConfigError::Missing("GITHUB_TOKEN"))
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default()),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_production() {
        let config = config(&[]).unwrap();
        assert!(config.token.is_none());
        assert_eq!(config.repo, RepoId::new("babalae", "bettergi-script-web-giscus"));
        assert_eq!(config.mapping_path, PathBuf::from("assets/author_mapping.json"));
        assert_eq!(config.notify.hub_discussion_id, 2);
        assert_eq!(config.notify.pacing, Duration::from_secs(1));
        assert_eq!(config.notify.channel.repository_id, "R_kgDOPbW19A");
        assert_eq!(config.notify.channel.category_id, "DIC_kwDOPbW19M4Ct_3t");
        assert_eq!(config.notify.channel.search_page_size, 10);
        assert_eq!(config.github_retries, 0);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("GITHUB_TOKEN", "ghp_x"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("AUTHOR_NOTIFY_REPO", "me/forum"),
            ("AUTHOR_NOTIFY_PACING_MS", "250"),
            ("AUTHOR_NOTIFY_HUB_DISCUSSION_ID", "21"),
            ("AUTHOR_NOTIFY_GITHUB_RETRIES", "2"),
        ])
        .unwrap();
        assert_eq!(config.require_token().unwrap().expose(), "ghp_x");
        assert_eq!(config.event_path, Some(PathBuf::from("/tmp/event.json")));
        assert_eq!(config.repo, RepoId::new("me", "forum"));
        assert_eq!(config.notify.pacing, Duration::from_millis(250));
        assert_eq!(config.notify.hub_discussion_id, 21);
        assert_eq!(config.github_retries, 2);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let config = config(&[("GITHUB_TOKEN", "  ")]).unwrap();
        assert!(matches!(
            config.require_token(),
            Err(ConfigError::Missing("GITHUB_TOKEN"))
        ));
    }

    #[test]
    fn unparseable_values_are_rejected() {
        assert!(matches!(
            config(&[("AUTHOR_NOTIFY_PACING_MS", "soon")]),
            Err(ConfigError::InvalidValue { var: "AUTHOR_NOTIFY_PACING_MS", .. })
        ));
        assert!(matches!(
            config(&[("AUTHOR_NOTIFY_REPO", "no-slash")]),
            Err(ConfigError::InvalidValue { var: "AUTHOR_NOTIFY_REPO", .. })
        ));
        assert!(matches!(
            config(&[("AUTHOR_NOTIFY_SEARCH_PAGE_SIZE", "0")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn token_debug_is_redacted() {
        let config = config(&[("GITHUB_TOKEN", "ghp_secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("ghp_secret"));
    }
}
