//! Script author notifier for the BetterGI script discussions.
//!
//! Two jobs share this library:
//!
//! - `sync` downloads the published script tree and turns it into an
//!   [`AuthorMapping`](types::AuthorMapping) from script path to author links
//!   ([`fetch`], [`index`], [`persistence`])
//! - `notify` takes a discussion comment event, finds the commented script's
//!   authors in that mapping and posts a notice into each author's own
//!   channel discussion ([`notify`], [`github`])
//!
//! GitHub access is expressed as [`effects`] so the notification logic can be
//! tested without a network.

pub mod config;
pub mod effects;
pub mod fetch;
pub mod github;
pub mod index;
pub mod notify;
pub mod persistence;
pub mod types;

#[cfg(test)]
mod test_utils;
