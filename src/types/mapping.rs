//! The flattened path → authors index.

use serde::{Deserialize, Serialize};

/// One row of the author index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAuthorEntry {
    /// Full slash-separated script path. Unique within a mapping.
    pub path: String,

    /// De-duplicated author profile links, in first-seen order.
    pub author_links: Vec<String>,
}

impl PathAuthorEntry {
    pub fn new<I, S>(path: impl Into<String>, author_links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PathAuthorEntry {
            path: path.into(),
            author_links: author_links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Summary counts over a mapping, logged after a sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub total_paths: usize,
    pub paths_with_authors: usize,
    pub paths_without_authors: usize,
}

/// The complete author index, serialized as a bare JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorMapping {
    entries: Vec<PathAuthorEntry>,
}

impl AuthorMapping {
    pub fn new(entries: Vec<PathAuthorEntry>) -> Self {
        AuthorMapping { entries }
    }

    /// Looks up a path verbatim. The first entry with that path wins.
    pub fn find(&self, path: &str) -> Option<&PathAuthorEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn entries(&self) -> &[PathAuthorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let with = self
            .entries
            .iter()
            .filter(|e| !e.author_links.is_empty())
            .count();
        IndexStats {
            total_paths: self.entries.len(),
            paths_with_authors: with,
            paths_without_authors: self.entries.len() - with,
        }
    }
}

impl FromIterator<PathAuthorEntry> for AuthorMapping {
    fn from_iter<T: IntoIterator<Item = PathAuthorEntry>>(iter: T) -> Self {
        AuthorMapping::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_links() {
        let mapping = AuthorMapping::new(vec![PathAuthorEntry::new(
            "js/foo",
            ["https://github.com/alice"],
        )]);
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "path": "js/foo", "authorLinks": ["https://github.com/alice"] }])
        );
    }

    #[test]
    fn find_is_verbatim() {
        let mapping = AuthorMapping::new(vec![PathAuthorEntry::new("js/Foo", ["a"])]);
        assert!(mapping.find("js/Foo").is_some());
        assert!(mapping.find("js/foo").is_none());
        assert!(mapping.find("js/Foo/").is_none());
    }

    #[test]
    fn stats_counts_empty_entries() {
        let mapping = AuthorMapping::new(vec![
            PathAuthorEntry::new("a", ["x"]),
            PathAuthorEntry::new("b", Vec::<String>::new()),
            PathAuthorEntry::new("c", ["y", "z"]),
        ]);
        assert_eq!(
            mapping.stats(),
            IndexStats {
                total_paths: 3,
                paths_with_authors: 2,
                paths_without_authors: 1,
            }
        );
    }
}
