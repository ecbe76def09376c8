//! Recursive aggregation of the content tree into a path → authors table.

use indexmap::{IndexMap, IndexSet};

use crate::types::{AuthorMapping, NodeKind, PathAuthorEntry, TreeNode};

/// Name of the root-level high-volume subtree whose files get no entries.
pub const DESIGNATED_SUBTREE: &str = "pathing";

/// Entries keyed by path. Re-inserting a path overwrites its links but keeps
/// its original position.
type PathTable = IndexMap<String, Vec<String>>;

/// Builds the author index from the root-level nodes of the content tree.
///
/// Every directory yields an entry whose links are the union of its own
/// declared authors and everything beneath it. Files yield their own entry
/// unless they sit inside the [`DESIGNATED_SUBTREE`]; their authors are passed
/// upward either way. When two nodes produce the same path, the later one wins.
///
/// Nodes with an unknown kind or no name contribute nothing.
pub fn build_index(roots: &[TreeNode]) -> AuthorMapping {
    let mut table = PathTable::new();
    for node in roots {
        collect(node, "", false, &mut table);
    }
    table
        .into_iter()
        .map(|(path, links)| PathAuthorEntry::new(path, links))
        .collect()
}

/// Walks one node, writing entries into `table` and returning the node's
/// aggregated links for the parent to absorb.
fn collect(node: &TreeNode, parent: &str, inherited: bool, table: &mut PathTable) -> Vec<String> {
    let Some(name) = node.name.as_deref() else {
        return Vec::new();
    };
    let full_path = if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    };
    let in_subtree = inherited
        || (parent.is_empty() && name == DESIGNATED_SUBTREE)
        || parent.starts_with(DESIGNATED_SUBTREE);

    match node.kind {
        NodeKind::File => {
            let links: Vec<String> = node
                .usable_links()
                .map(str::to_string)
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect();
            if !in_subtree {
                table.insert(full_path, links.clone());
            }
            links
        }
        NodeKind::Directory => {
            let mut acc: IndexSet<String> = node.usable_links().map(str::to_string).collect();
            for child in &node.children {
                acc.extend(collect(child, &full_path, in_subtree, table));
            }
            let links: Vec<String> = acc.into_iter().collect();
            table.insert(full_path, links.clone());
            links
        }
        NodeKind::Unknown => Vec::new(),
    }
}
