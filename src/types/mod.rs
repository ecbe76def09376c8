//! Core domain types for the author notifier.
//!
//! This module contains the upstream tree shape, the flattened author index,
//! and the identifier newtypes used throughout the application.

pub mod ids;
pub mod mapping;
pub mod tree;

// Re-export commonly used types at the module level
pub use ids::{AuthorLogin, DiscussionNodeId, DiscussionNumber, InvalidRepoId, RepoId};
pub use mapping::{AuthorMapping, IndexStats, PathAuthorEntry};
pub use tree::{AuthorRef, NodeKind, RepoIndexDocument, TreeNode};
