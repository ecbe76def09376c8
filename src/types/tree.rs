//! Upstream content tree shapes.
//!
//! The upstream `repo.json` describes every script as a node in a tree of
//! directories and files. Only the fields the index builder reads are modelled;
//! everything else in the document is ignored during deserialization.
//!
//! Parsing is lenient at the field level. A `type` that is missing, null or
//! unrecognized becomes [`NodeKind::Unknown`]; a numeric `name` is taken as its
//! decimal text; a null or wrong-typed `name`, `authors` or `children` is
//! treated as absent; and list elements that are not objects are dropped. A
//! malformed node contributes nothing to the index and never fails the
//! document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The top-level upstream document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoIndexDocument {
    /// Root-level tree nodes.
    #[serde(default, deserialize_with = "object_list")]
    pub indexes: Vec<TreeNode>,
}

/// The kind of a tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Directory,
    /// Missing or unrecognized `type`.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A declared author on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    /// Profile link. May be absent, empty or whitespace.
    #[serde(default, deserialize_with = "string_only")]
    pub link: Option<String>,
}

impl AuthorRef {
    pub fn new(link: impl Into<String>) -> Self {
        AuthorRef {
            link: Some(link.into()),
        }
    }

    /// Returns the link if it carries any non-whitespace content.
    pub fn usable_link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// One entry in the upstream content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Path segment for this node.
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "node_kind")]
    pub kind: NodeKind,

    #[serde(default, deserialize_with = "optional_object_list")]
    pub authors: Option<Vec<AuthorRef>>,

    /// Children; only meaningful on directories.
    #[serde(default, deserialize_with = "object_list")]
    pub children: Vec<TreeNode>,
}

fn string_only<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn node_kind<'de, D: Deserializer<'de>>(d: D) -> Result<NodeKind, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
}

/// Decodes each element on its own, dropping the ones that don't fit.
fn decode_elements<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn object_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => decode_elements(items),
        _ => Vec::new(),
    })
}

fn optional_object_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(decode_elements(items)),
        _ => None,
    })
}

impl TreeNode {
    /// Creates a file node with the given author links.
    pub fn file<I, S>(name: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TreeNode {
            name: Some(name.into()),
            kind: NodeKind::File,
            authors: Some(links.into_iter().map(AuthorRef::new).collect()),
            children: Vec::new(),
        }
    }

    /// Creates a directory node with no declared authors.
    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: Some(name.into()),
            kind: NodeKind::Directory,
            authors: None,
            children,
        }
    }

    /// Sets the node's own declared author links.
    pub fn with_authors<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(links.into_iter().map(AuthorRef::new).collect());
        self
    }

    /// Iterates the node's declared links, skipping blank ones.
    pub fn usable_links(&self) -> impl Iterator<Item = &str> {
        self.authors
            .iter()
            .flatten()
            .filter_map(AuthorRef::usable_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upstream_shape_ignoring_extra_fields() {
        let json = r#"{
            "time": "20250101",
            "indexes": [
                {
                    "name": "js",
                    "type": "directory",
                    "hash": "abc",
                    "children": [
                        {
                            "name": "foo",
                            "type": "file",
                            "version": "1.0",
                            "authors": [{ "name": "Alice", "link": "https://github.com/alice" }]
                        }
                    ]
                }
            ]
        }"#;

        let doc: RepoIndexDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.indexes.len(), 1);
        let root = &doc.indexes[0];
        assert_eq!(root.kind, NodeKind::Directory);
        assert_eq!(root.children[0].kind, NodeKind::File);
        assert_eq!(
            root.children[0].usable_links().collect::<Vec<_>>(),
            vec!["https://github.com/alice"]
        );
    }

    #[test]
    fn unknown_or_missing_type_is_unknown() {
        let node: TreeNode = serde_json::from_str(r#"{"name": "x", "type": "symlink"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);

        let node: TreeNode = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
    }

    #[test]
    fn null_and_wrong_typed_fields_are_tolerated() {
        let node: TreeNode = serde_json::from_str(
            r#"{"name": null, "type": null, "authors": "x", "children": null}"#,
        )
        .unwrap();
        assert_eq!(node, TreeNode::default());

        let node: TreeNode = serde_json::from_str(r#"{"name": 5, "type": 3}"#).unwrap();
        assert_eq!(node.name.as_deref(), Some("5"));
        assert_eq!(node.kind, NodeKind::Unknown);
    }

    #[test]
    fn malformed_sibling_does_not_hide_good_one() {
        let good = r#"{"name": "good", "type": "file", "authors": [{"link": "https://h/a"}]}"#;
        for bad in [
            r#"{"name": "bad", "type": null}"#,
            r#"{"name": "bad", "type": "directory", "children": null}"#,
            r#"{"name": 5, "type": "file", "authors": [{"link": "https://h/b"}]}"#,
            r#"{"name": "bad", "type": "file", "authors": [{"link": 7}, 3]}"#,
            r#"42"#,
        ] {
            let json = format!(r#"{{"indexes": [{bad}, {good}]}}"#);
            let doc: RepoIndexDocument = serde_json::from_str(&json).unwrap();
            let mapping = crate::index::build_index(&doc.indexes);
            assert_eq!(
                mapping.find("good").map(|e| e.author_links.clone()),
                Some(vec!["https://h/a".to_string()]),
                "bad sibling: {bad}"
            );
        }
    }

    #[test]
    fn non_object_children_are_dropped() {
        let node: TreeNode = serde_json::from_str(
            r#"{"name": "d", "type": "directory", "children": [null, "x", {"name": "f", "type": "file"}]}"#,
        )
        .unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name.as_deref(), Some("f"));
    }

    #[test]
    fn missing_indexes_is_empty() {
        let doc: RepoIndexDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.indexes.is_empty());
    }

    #[test]
    fn blank_and_missing_links_are_unusable() {
        let node: TreeNode = serde_json::from_str(
            r#"{"name": "f", "type": "file", "authors": [
                {"link": ""}, {"link": "   "}, {"name": "nolink"}, {"link": "https://h/a"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(node.usable_links().collect::<Vec<_>>(), vec!["https://h/a"]);
    }
}
