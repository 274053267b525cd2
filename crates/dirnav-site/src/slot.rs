//! In-memory holder for the most recently loaded tree.
//!
//! The slot holds at most one tree together with the base path it was
//! built from. Trees are shared as `Arc<Node>`: installing a new tree drops
//! the slot's reference to the old one, while callers holding it keep a
//! valid snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::node::Node;

struct Entry {
    base: PathBuf,
    tree: Arc<Node>,
}

/// Process-wide cache of one tree, keyed by base path.
#[derive(Default)]
pub struct TreeSlot {
    entry: RwLock<Option<Entry>>,
}

impl TreeSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the held tree if it was built from exactly `base`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self, base: &Path) -> Option<Arc<Node>> {
        let entry = self.entry.read().unwrap();
        entry
            .as_ref()
            .filter(|e| e.base == base)
            .map(|e| Arc::clone(&e.tree))
    }

    /// Replace the held tree, returning a shared handle to the new one.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn install(&self, base: &Path, tree: Node) -> Arc<Node> {
        let tree = Arc::new(tree);
        *self.entry.write().unwrap() = Some(Entry {
            base: base.to_path_buf(),
            tree: Arc::clone(&tree),
        });
        tree
    }

    /// Release the held tree.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn invalidate(&self) {
        self.entry.write().unwrap().take();
    }
}
