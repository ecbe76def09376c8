//! Author index construction.
//!
//! The upstream content tree is walked once and flattened into an
//! [`AuthorMapping`](crate::types::AuthorMapping): one entry per directory and
//! per addressable file, each listing every author who contributed at or
//! below that path.
//!
//! Files under the high-volume `pathing` subtree are not individually
//! addressable. Their authors still roll up into every enclosing directory.

mod builder;

pub use builder::{DESIGNATED_SUBTREE, build_index};
