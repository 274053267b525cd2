//! Directory tree cache and navigation for static sites.
//!
//! This crate provides:
//! - [`Site`]: Tree loading with in-memory and on-disk caching
//! - [`TreeBuilder`]: Filesystem walk producing a title-sorted [`Node`] tree
//! - [`codec`]: Line-oriented cache file format
//! - Navigation queries ([`render_menu`], [`render_submenu`], [`up`],
//!   [`prev`], [`next`], [`last`], [`locate_by_title`])
//! - Breadcrumb trails ([`breadcrumbs`], [`render_navbar`], [`render_titlebar`])
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use dirnav_extract::FsExtractor;
//! use dirnav_site::{LoadOptions, RenderOptions, Site, SiteConfig, render_menu};
//!
//! let site = Site::new(Arc::new(FsExtractor), SiteConfig::default());
//! let tree = site.load(Path::new("/var/www"), &LoadOptions::default());
//!
//! if let Some(tree) = tree {
//!     let open = Path::new("/var/www/products");
//!     print!("{}", render_menu(&tree, Some(open), &RenderOptions::default()));
//! }
//! ```

mod breadcrumbs;
mod builder;
pub mod codec;
mod navigation;
mod node;
mod site;
mod slot;
mod tree_store;

pub use breadcrumbs::{BreadcrumbItem, breadcrumbs, render_navbar, render_titlebar};
pub use builder::{
    DEFAULT_HIDDEN_MARKER, DEFAULT_INDEX_FILE, NotAContentNode, NotAContentReason, TreeBuilder,
};
pub use navigation::{
    RenderOptions, last, locate_by_title, next, prev, render_menu, render_submenu,
    visible_sequence, up, write_menu, write_submenu,
};
pub use node::{Node, Preorder, is_ancestor_or_self};
pub use site::{DEFAULT_MAX_AGE, LoadOptions, Site, SiteConfig};
pub use slot::TreeSlot;
pub use tree_store::{DEFAULT_CACHE_FILE, FileTreeStore, Freshness, NullTreeStore, TreeStore};
