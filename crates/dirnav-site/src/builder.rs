//! Tree construction by filesystem walking.
//!
//! A directory becomes a [`Node`] only if its index document yields a title.
//! Directories without one (asset folders, unreadable directories) are not
//! errors; they are left out of their parent's children.

use std::fs;
use std::path::{Path, PathBuf};

use dirnav_extract::SectionExtractor;

use crate::node::{Node, sort_by_title};

/// Section that carries a directory's display title.
const TITLE_SECTION: &str = "title";

/// Default name of the index document inside each directory.
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Default name of the sentinel file that hides a directory.
pub const DEFAULT_HIDDEN_MARKER: &str = ".hidden";

/// Why a directory did not produce a node.
#[derive(Debug)]
pub enum NotAContentReason {
    /// The directory could not be opened.
    Unreadable(std::io::Error),
    /// The index document is missing or has no usable title.
    MissingTitle,
}

/// The directory at `path` is not a content node.
///
/// This is an expected outcome, not a failure: callers drop such
/// directories silently.
#[derive(Debug, thiserror::Error)]
#[error("Not a content node: {}", path.display())]
pub struct NotAContentNode {
    /// Normalised directory path.
    pub path: PathBuf,
    /// What disqualified the directory.
    pub reason: NotAContentReason,
}

/// Builds [`Node`] trees from a directory hierarchy.
pub struct TreeBuilder<'a> {
    extractor: &'a dyn SectionExtractor,
    index_file: &'a str,
    hidden_marker: &'a str,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder using the default index and hidden-marker names.
    #[must_use]
    pub fn new(extractor: &'a dyn SectionExtractor) -> Self {
        Self {
            extractor,
            index_file: DEFAULT_INDEX_FILE,
            hidden_marker: DEFAULT_HIDDEN_MARKER,
        }
    }

    /// Set the index document name (default `index.html`).
    #[must_use]
    pub fn with_index_file(mut self, index_file: &'a str) -> Self {
        self.index_file = index_file;
        self
    }

    /// Set the hidden sentinel file name (default `.hidden`).
    #[must_use]
    pub fn with_hidden_marker(mut self, hidden_marker: &'a str) -> Self {
        self.hidden_marker = hidden_marker;
        self
    }

    /// Build the tree rooted at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory to index (trailing separators are ignored)
    /// * `depth_limit` - Levels to descend below `path`; negative means
    ///   unlimited, zero means the root only
    pub fn build(&self, path: &Path, depth_limit: i32) -> Result<Node, NotAContentNode> {
        let path = normalize(path);

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                return Err(NotAContentNode {
                    path,
                    reason: NotAContentReason::Unreadable(e),
                });
            }
        };

        let Some(title) = read_title(self.extractor, &path, self.index_file) else {
            return Err(NotAContentNode {
                path,
                reason: NotAContentReason::MissingTitle,
            });
        };

        let hidden = fs::File::open(path.join(self.hidden_marker)).is_ok();

        let mut children = Vec::new();
        if depth_limit != 0 {
            for entry in entries.filter_map(Result::ok) {
                // file_type() does not follow symlinks
                if !entry.file_type().is_ok_and(|t| t.is_dir()) {
                    continue;
                }
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    tracing::debug!(dir = %path.display(), "skipping non-UTF-8 directory name");
                    continue;
                };

                match self.build(&path.join(name), depth_limit.saturating_sub(1)) {
                    Ok(child) => children.push(child),
                    Err(e) => {
                        tracing::trace!(path = %e.path.display(), reason = ?e.reason, "dropping directory");
                    }
                }
            }
            sort_by_title(&mut children);
        }

        Ok(Node {
            path,
            title,
            hidden,
            children,
        })
    }
}

/// Read and normalise the title of the index document in `dir`.
///
/// Returns `None` if the document is unreadable or the title is blank.
pub(crate) fn read_title(
    extractor: &dyn SectionExtractor,
    dir: &Path,
    index_file: &str,
) -> Option<String> {
    let index = dir.join(index_file);
    let raw = extractor.extract_section(&index, TITLE_SECTION).ok()?;
    let title = normalize_title(&raw);
    (!title.is_empty()).then_some(title)
}

/// Strip trailing separators, keeping a bare root intact.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    // Path::components already drops trailing separators
    path.components().collect()
}

/// Collapse whitespace runs (including newlines) and trim.
fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
