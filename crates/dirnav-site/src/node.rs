//! Content node tree.
//!
//! A [`Node`] is a directory whose index document yields a title. Children
//! are owned directly by their parent and kept sorted by title at every
//! level, so a preorder walk visits the site in menu order.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One content directory in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Absolute directory path without trailing separator.
    pub path: PathBuf,
    /// Display title from the directory's index document.
    pub title: String,
    /// True if the directory contains the hidden sentinel file.
    pub hidden: bool,
    /// Child content nodes, sorted by title.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node, sorting `children` by title.
    #[must_use]
    pub fn new(path: PathBuf, title: String, hidden: bool, mut children: Vec<Node>) -> Self {
        sort_by_title(&mut children);
        Self {
            path,
            title,
            hidden,
            children,
        }
    }

    /// URL of this node relative to `document_root`.
    ///
    /// The document root prefix is stripped from the path; the root itself
    /// maps to `/`. Paths outside the document root are returned unchanged.
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use dirnav_site::Node;
    ///
    /// let node = Node::new(PathBuf::from("/srv/www/about"), "About".into(), false, Vec::new());
    /// assert_eq!(node.url(Path::new("/srv/www")), "/about");
    /// ```
    #[must_use]
    pub fn url(&self, document_root: &Path) -> String {
        path_to_url(&self.path, document_root)
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// Always false: a node counts itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the subtree in preorder (parent before children).
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Find the node whose path equals `path` exactly.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&Node> {
        if !is_ancestor_or_self(&self.path, path) {
            return None;
        }
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }

    /// True if every level of the subtree is sorted by title.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.children
            .windows(2)
            .all(|pair| compare_nodes(&pair[0], &pair[1]) != Ordering::Greater)
            && self.children.iter().all(Node::is_sorted)
    }
}

/// Preorder iterator over a [`Node`] subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = Preorder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ancestor-or-self boundary test.
///
/// `ancestor` matches `path` only on whole path components, so `/a/fo` is
/// an ancestor of `/a/fo/bar` and of itself but not of `/a/foobar`.
#[must_use]
pub fn is_ancestor_or_self(ancestor: &Path, path: &Path) -> bool {
    path.starts_with(ancestor)
}

/// Convert a filesystem path to a URL under `document_root`.
pub(crate) fn path_to_url(path: &Path, document_root: &Path) -> String {
    let Ok(rest) = path.strip_prefix(document_root) else {
        return path.to_string_lossy().into_owned();
    };
    let rest = rest.to_string_lossy();
    if rest.is_empty() {
        "/".to_owned()
    } else {
        format!("/{rest}")
    }
}

/// Title order, with path as tie-breaker so equal titles sort deterministically.
fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    a.title.cmp(&b.title).then_with(|| a.path.cmp(&b.path))
}

pub(crate) fn sort_by_title(nodes: &mut [Node]) {
    nodes.sort_by(compare_nodes);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a node without touching the filesystem.
    pub(crate) fn node(path: &str, title: &str, children: Vec<Node>) -> Node {
        Node::new(PathBuf::from(path), title.to_owned(), false, children)
    }

    /// Build a hidden node without touching the filesystem.
    pub(crate) fn hidden(path: &str, title: &str, children: Vec<Node>) -> Node {
        Node::new(PathBuf::from(path), title.to_owned(), true, children)
    }

    #[test]
    fn test_ancestor_or_self_boundary() {
        assert!(!is_ancestor_or_self(Path::new("/a/fo"), Path::new("/a/foobar")));
        assert!(is_ancestor_or_self(Path::new("/a/fo"), Path::new("/a/fo/bar")));
        assert!(is_ancestor_or_self(Path::new("/a/fo"), Path::new("/a/fo")));
    }

    #[test]
    fn test_ancestor_or_self_root() {
        assert!(is_ancestor_or_self(Path::new("/"), Path::new("/a")));
        assert!(!is_ancestor_or_self(Path::new("/a/b"), Path::new("/a")));
    }

    #[test]
    fn test_new_sorts_children_by_title() {
        let root = node(
            "/www",
            "Home",
            vec![
                node("/www/c", "Charlie", Vec::new()),
                node("/www/a", "Alpha", Vec::new()),
                node("/www/b", "Bravo", Vec::new()),
            ],
        );

        let titles: Vec<_> = root.children.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Bravo", "Charlie"]);
        assert!(root.is_sorted());
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let root = node(
            "/www",
            "Home",
            vec![
                node("/www/a", "apple", Vec::new()),
                node("/www/b", "Banana", Vec::new()),
            ],
        );

        // Upper-case letters sort before lower-case ones
        assert_eq!(root.children[0].title, "Banana");
    }

    #[test]
    fn test_equal_titles_sort_by_path() {
        let root = node(
            "/www",
            "Home",
            vec![
                node("/www/z", "Contact", Vec::new()),
                node("/www/a", "Contact", Vec::new()),
            ],
        );

        assert_eq!(root.children[0].path, PathBuf::from("/www/a"));
    }

    #[test]
    fn test_url_strips_document_root() {
        let root = Path::new("/srv/www");
        assert_eq!(node("/srv/www", "Home", Vec::new()).url(root), "/");
        assert_eq!(node("/srv/www/a/b", "B", Vec::new()).url(root), "/a/b");
        assert_eq!(node("/elsewhere", "X", Vec::new()).url(root), "/elsewhere");
    }

    #[test]
    fn test_preorder_iteration() {
        let root = node(
            "/www",
            "Home",
            vec![
                node("/www/b", "B", vec![node("/www/b/x", "X", Vec::new())]),
                node("/www/a", "A", Vec::new()),
            ],
        );

        let titles: Vec<_> = root.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Home", "A", "B", "X"]);
        assert_eq!(root.len(), 4);
    }

    #[test]
    fn test_find_exact_path() {
        let root = node(
            "/www",
            "Home",
            vec![node("/www/fo", "Fo", vec![node("/www/fo/bar", "Bar", Vec::new())])],
        );

        assert_eq!(root.find(Path::new("/www/fo/bar")).unwrap().title, "Bar");
        assert!(root.find(Path::new("/www/foobar")).is_none());
        assert!(root.find(Path::new("/other")).is_none());
    }
}
