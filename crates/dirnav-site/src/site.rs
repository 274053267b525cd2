//! Tree loading with in-memory and on-disk caching.
//!
//! [`Site`] answers "give me the tree rooted at this base path" from, in
//! order:
//!
//! 1. The in-memory [`TreeSlot`], if it holds a tree for exactly that base
//! 2. The disk [`TreeStore`], if caching is allowed and the file is fresh
//! 3. A fresh [`TreeBuilder`] walk, which is then persisted and installed
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use dirnav_extract::FsExtractor;
//! use dirnav_site::{LoadOptions, Site, SiteConfig};
//!
//! let site = Site::new(Arc::new(FsExtractor), SiteConfig::default());
//! if let Some(tree) = site.load(Path::new("/var/www"), &LoadOptions::default()) {
//!     println!("{} pages", tree.len());
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use dirnav_extract::SectionExtractor;

use crate::builder::{DEFAULT_HIDDEN_MARKER, DEFAULT_INDEX_FILE, TreeBuilder, normalize};
use crate::codec::DEFAULT_MAX_NODES;
use crate::node::Node;
use crate::slot::TreeSlot;
use crate::tree_store::{DEFAULT_CACHE_FILE, FileTreeStore, Freshness, NullTreeStore, TreeStore};

/// Default freshness window for disk caches (5 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Whether built trees are persisted and reused from disk.
    pub cache_enabled: bool,
    /// Maximum age of a usable cache file.
    pub max_age: Duration,
    /// Cache file name inside the base directory.
    pub cache_file_name: String,
    /// Node cap for a single cache write.
    pub max_nodes: usize,
    /// Index document name inside each directory.
    pub index_file: String,
    /// Sentinel file that marks a directory hidden.
    pub hidden_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_age: DEFAULT_MAX_AGE,
            cache_file_name: DEFAULT_CACHE_FILE.to_owned(),
            max_nodes: DEFAULT_MAX_NODES,
            index_file: DEFAULT_INDEX_FILE.to_owned(),
            hidden_marker: DEFAULT_HIDDEN_MARKER.to_owned(),
        }
    }
}

/// Per-call options for [`Site::load`].
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Levels to descend below the base; negative means unlimited.
    pub depth_limit: i32,
    /// Skip the disk cache and rebuild.
    pub no_cache: bool,
    /// Reference time for the freshness check.
    pub now: SystemTime,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            depth_limit: -1,
            no_cache: false,
            now: SystemTime::now(),
        }
    }
}

impl LoadOptions {
    /// True if a `Cache-Control` style directive requests no caching.
    ///
    /// ```
    /// use dirnav_site::LoadOptions;
    ///
    /// assert!(LoadOptions::no_cache_directive(Some("no-cache")));
    /// assert!(!LoadOptions::no_cache_directive(Some("max-age=0")));
    /// assert!(!LoadOptions::no_cache_directive(None));
    /// ```
    #[must_use]
    pub fn no_cache_directive(value: Option<&str>) -> bool {
        value.is_some_and(|v| v.trim() == "no-cache")
    }
}

/// Loads and caches content trees.
///
/// The slot is the only long-lived owner of a loaded tree; callers receive
/// `Arc<Node>` snapshots that stay valid after the slot moves on.
pub struct Site {
    extractor: Arc<dyn SectionExtractor>,
    store: Box<dyn TreeStore>,
    slot: TreeSlot,
    max_age: Duration,
    index_file: String,
    hidden_marker: String,
}

impl Site {
    /// Create a new site with a section extractor and configuration.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Reads titles out of index documents
    /// * `config` - Site configuration
    #[must_use]
    pub fn new(extractor: Arc<dyn SectionExtractor>, config: SiteConfig) -> Self {
        let store: Box<dyn TreeStore> = if config.cache_enabled {
            Box::new(FileTreeStore::new(config.cache_file_name, config.max_nodes))
        } else {
            Box::new(NullTreeStore)
        };

        Self {
            extractor,
            store,
            slot: TreeSlot::new(),
            max_age: config.max_age,
            index_file: config.index_file,
            hidden_marker: config.hidden_marker,
        }
    }

    /// Get the tree rooted at `base`.
    ///
    /// A tree already held in memory for `base` is returned as is, even when
    /// `no_cache` is set; call [`Site::invalidate`] first to force a reload.
    ///
    /// Returns `None` if `base` itself is not a content node.
    pub fn load(&self, base: &Path, options: &LoadOptions) -> Option<Arc<Node>> {
        let base = &normalize(base);
        if let Some(tree) = self.slot.get(base) {
            tracing::debug!(base = %base.display(), "using in-memory tree");
            return Some(tree);
        }

        if !options.no_cache {
            let freshness = Freshness {
                now: options.now,
                max_age: self.max_age,
            };
            if let Some(tree) = self.store.get(base, freshness) {
                tracing::debug!(base = %base.display(), "using cached tree");
                return Some(self.slot.install(base, tree));
            }
        }

        self.rebuild(base, options.depth_limit)
    }

    /// Build the tree for `base` from the filesystem, ignoring all caches.
    ///
    /// The result is persisted (best effort) and installed in memory.
    pub fn rebuild(&self, base: &Path, depth_limit: i32) -> Option<Arc<Node>> {
        let base = &normalize(base);
        let tree = match self.builder().build(base, depth_limit) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(base = %base.display(), reason = ?e.reason, "base is not a content node");
                return None;
            }
        };
        tracing::info!(base = %base.display(), nodes = tree.len(), "built content tree");

        self.store.set(base, &tree);
        Some(self.slot.install(base, tree))
    }

    /// Release the in-memory tree so the next load consults disk again.
    pub fn invalidate(&self) {
        self.slot.invalidate();
    }

    /// Remove the disk cache for `base`.
    pub fn invalidate_disk(&self, base: &Path) {
        self.store.invalidate(&normalize(base));
    }

    /// Section extractor used for titles.
    #[must_use]
    pub fn extractor(&self) -> &dyn SectionExtractor {
        self.extractor.as_ref()
    }

    /// Index document name used for titles.
    #[must_use]
    pub fn index_file(&self) -> &str {
        &self.index_file
    }

    fn builder(&self) -> TreeBuilder<'_> {
        TreeBuilder::new(self.extractor.as_ref())
            .with_index_file(&self.index_file)
            .with_hidden_marker(&self.hidden_marker)
    }
}
