//! Disk persistence for built trees.
//!
//! Provides [`TreeStore`] trait and implementations:
//! - [`FileTreeStore`]: One cache file per base directory, encoded with [`codec`](crate::codec)
//! - [`NullTreeStore`]: No-op store (always returns `None`)
//!
//! # Freshness
//!
//! A cache file is used only while `mtime + max_age >= now`. Anything that
//! goes wrong reading it (missing, unreadable, partially written, malformed)
//! is a miss, and the caller rebuilds from the filesystem.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;

use crate::codec::{self, DEFAULT_MAX_NODES};
use crate::node::Node;

/// Default cache file name inside the base directory.
pub const DEFAULT_CACHE_FILE: &str = ".cache";

/// Freshness window for a cache lookup.
#[derive(Clone, Copy, Debug)]
pub struct Freshness {
    /// Reference time for the check.
    pub now: SystemTime,
    /// Maximum age of a usable cache file.
    pub max_age: Duration,
}

impl Freshness {
    /// True if a file modified at `mtime` is still usable.
    #[must_use]
    pub fn accepts(&self, mtime: SystemTime) -> bool {
        mtime
            .checked_add(self.max_age)
            .is_some_and(|expires| expires >= self.now)
    }
}

/// Persistent storage of built trees, keyed by base directory.
pub trait TreeStore: Send + Sync {
    /// Retrieve the stored tree for `base`.
    ///
    /// Returns `None` on miss, stale entry, invalid content, or a tree
    /// rooted somewhere other than `base`.
    fn get(&self, base: &Path, freshness: Freshness) -> Option<Node>;

    /// Store `tree` for `base`. Failures are logged, never returned.
    fn set(&self, base: &Path, tree: &Node);

    /// Remove the stored tree for `base`.
    fn invalidate(&self, base: &Path);
}

/// No-op store used when caching is disabled.
pub struct NullTreeStore;

impl TreeStore for NullTreeStore {
    fn get(&self, _base: &Path, _freshness: Freshness) -> Option<Node> {
        None
    }

    fn set(&self, _base: &Path, _tree: &Node) {}

    fn invalidate(&self, _base: &Path) {}
}

/// File-based store writing `{base}/{file_name}`.
pub struct FileTreeStore {
    file_name: String,
    max_nodes: usize,
}

impl Default for FileTreeStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE.to_owned(), DEFAULT_MAX_NODES)
    }
}

impl FileTreeStore {
    /// Create a new file-based tree store.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Cache file name inside each base directory
    /// * `max_nodes` - Node cap passed to each encode
    #[must_use]
    pub fn new(file_name: String, max_nodes: usize) -> Self {
        Self {
            file_name,
            max_nodes,
        }
    }

    /// Get path to the cache file for `base`.
    #[must_use]
    pub fn cache_path(&self, base: &Path) -> PathBuf {
        base.join(&self.file_name)
    }

    fn write(&self, cache_path: &Path, tree: &Node) -> std::io::Result<()> {
        let dir = cache_path.parent().unwrap_or(Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;

        let mut out = BufWriter::new(tmp);
        writeln!(out, "# Cache path: {}", cache_path.display())?;
        let summary = codec::encode(tree, &mut out, self.max_nodes)?;
        if summary.truncated {
            tracing::warn!(
                path = %cache_path.display(),
                max_nodes = self.max_nodes,
                "tree exceeds node limit, cache file truncated"
            );
        }

        let tmp = out.into_inner().map_err(std::io::IntoInnerError::into_error)?;
        tmp.persist(cache_path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TreeStore for FileTreeStore {
    fn get(&self, base: &Path, freshness: Freshness) -> Option<Node> {
        let cache_path = self.cache_path(base);

        let mtime = fs::metadata(&cache_path).and_then(|m| m.modified()).ok()?;
        if !freshness.accepts(mtime) {
            tracing::debug!(path = %cache_path.display(), "tree cache is stale");
            return None;
        }

        let file = match File::open(&cache_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %cache_path.display(), error = %e, "Failed to open tree cache");
                return None;
            }
        };

        match codec::decode(BufReader::new(file)) {
            Ok(Some(tree)) if tree.path != base => {
                tracing::debug!(
                    path = %cache_path.display(),
                    root = %tree.path.display(),
                    "tree cache belongs to another base"
                );
                None
            }
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(path = %cache_path.display(), error = %e, "Failed to decode tree cache");
                None
            }
        }
    }

    fn set(&self, base: &Path, tree: &Node) {
        let cache_path = self.cache_path(base);
        // Silently ignore errors - cache is optional
        if let Err(e) = self.write(&cache_path, tree) {
            tracing::debug!(path = %cache_path.display(), error = %e, "Failed to write tree cache");
        }
    }

    fn invalidate(&self, base: &Path) {
        let cache_path = self.cache_path(base);
        if cache_path.exists()
            && let Err(e) = fs::remove_file(&cache_path)
        {
            tracing::debug!(error = %e, "Failed to remove tree cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::tests::{hidden, node};

    fn fresh() -> Freshness {
        Freshness {
            now: SystemTime::now(),
            max_age: Duration::from_secs(300),
        }
    }

    fn create_test_tree(base: &Path) -> Node {
        let base_str = base.to_str().unwrap();
        node(
            base_str,
            "Home",
            vec![
                node(&format!("{base_str}/guide"), "Guide", Vec::new()),
                hidden(&format!("{base_str}/drafts"), "Drafts", Vec::new()),
            ],
        )
    }

    // Freshness tests

    #[test]
    fn test_freshness_window_is_inclusive() {
        let now = SystemTime::now();
        let freshness = Freshness {
            now,
            max_age: Duration::from_secs(300),
        };

        assert!(freshness.accepts(now));
        assert!(freshness.accepts(now - Duration::from_secs(300)));
        assert!(!freshness.accepts(now - Duration::from_secs(301)));
    }

    // NullTreeStore tests

    #[test]
    fn test_null_store_get_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NullTreeStore;

        store.set(tmp.path(), &create_test_tree(tmp.path()));

        assert!(store.get(tmp.path(), fresh()).is_none());
        assert!(!tmp.path().join(DEFAULT_CACHE_FILE).exists());
    }

    // FileTreeStore tests

    #[test]
    fn test_file_store_get_missing_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();

        assert!(store.get(tmp.path(), fresh()).is_none());
    }

    #[test]
    fn test_file_store_set_and_get() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();
        let tree = create_test_tree(tmp.path());

        store.set(tmp.path(), &tree);

        assert_eq!(store.get(tmp.path(), fresh()), Some(tree));
    }

    #[test]
    fn test_file_store_writes_header_comment() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();

        store.set(tmp.path(), &create_test_tree(tmp.path()));

        let content = fs::read_to_string(tmp.path().join(".cache")).unwrap();
        assert!(content.starts_with("# Cache path: "));
        assert!(content.contains("# Node 0\n"));
    }

    #[test]
    fn test_file_store_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();

        store.set(tmp.path(), &create_test_tree(tmp.path()));
        store.set(tmp.path(), &create_test_tree(tmp.path()));

        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, [".cache"]);
    }

    #[test]
    fn test_file_store_stale_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();
        store.set(tmp.path(), &create_test_tree(tmp.path()));

        let later = Freshness {
            now: SystemTime::now() + Duration::from_secs(3600),
            max_age: Duration::from_secs(300),
        };

        assert!(store.get(tmp.path(), later).is_none());
    }

    #[test]
    fn test_file_store_custom_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::new(".navtree".to_owned(), DEFAULT_MAX_NODES);

        store.set(tmp.path(), &create_test_tree(tmp.path()));

        assert!(tmp.path().join(".navtree").exists());
        assert!(store.get(tmp.path(), fresh()).is_some());
    }

    #[test]
    fn test_file_store_truncated_tree_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::new(DEFAULT_CACHE_FILE.to_owned(), 1);

        store.set(tmp.path(), &create_test_tree(tmp.path()));

        assert!(tmp.path().join(".cache").exists());
        assert!(store.get(tmp.path(), fresh()).is_none());
    }

    #[test]
    fn test_file_store_corrupt_file_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".cache"), "/www\nHome\nnot counts\n").unwrap();

        let store = FileTreeStore::default();

        assert!(store.get(tmp.path(), fresh()).is_none());
    }

    #[test]
    fn test_file_store_partial_write_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".cache"), "# Node 0\n/www\nHome\n0 3\n# Node 1\n/www/a\n")
            .unwrap();

        let store = FileTreeStore::default();

        assert!(store.get(tmp.path(), fresh()).is_none());
    }

    #[test]
    fn test_file_store_foreign_root_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let other = tmp.path().join("other");
        fs::create_dir(&other).unwrap();
        let store = FileTreeStore::default();
        store.set(tmp.path(), &create_test_tree(tmp.path()));

        fs::copy(tmp.path().join(".cache"), other.join(".cache")).unwrap();

        assert!(store.get(&other, fresh()).is_none());
        assert!(store.get(tmp.path(), fresh()).is_some());
    }

    #[test]
    fn test_file_store_unwritable_base_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();
        let missing = tmp.path().join("missing");

        // Should not panic
        store.set(&missing, &create_test_tree(&missing));

        assert!(!missing.exists());
    }

    #[test]
    fn test_file_store_invalidate() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();
        store.set(tmp.path(), &create_test_tree(tmp.path()));

        store.invalidate(tmp.path());

        assert!(store.get(tmp.path(), fresh()).is_none());
        assert!(!tmp.path().join(".cache").exists());
    }

    #[test]
    fn test_file_store_invalidate_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTreeStore::default();

        // Should not panic when file doesn't exist
        store.invalidate(tmp.path());
    }
}
