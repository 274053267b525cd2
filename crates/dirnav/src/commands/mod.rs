//! CLI command implementations.
//!
//! Every command loads a tree through [`SiteArgs::context`], which merges
//! `dirnav.toml` with command-line overrides and resolves the base and open
//! paths against the document root.
//!
//! Commands compute their answer as a string first. A base that is not a
//! content directory, or a query without an answer, yields an empty string
//! and a successful exit.

pub(crate) mod bar;
pub(crate) mod menu;
pub(crate) mod query;
pub(crate) mod tree;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use dirnav_config::{CliSettings, Config};
use dirnav_extract::FsExtractor;
use dirnav_site::{LoadOptions, Node, RenderOptions, Site, SiteConfig};

use crate::error::CliError;

pub(crate) use bar::BarArgs;
pub(crate) use menu::MenuArgs;
pub(crate) use query::{LocateArgs, Position, QueryArgs};
pub(crate) use tree::TreeArgs;

/// Open path value meaning "nothing selected".
const OPEN_ALL: &str = "ALL";

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover dirnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document root that maps to the URL "/" (overrides config).
    #[arg(long, env = "DOCUMENT_ROOT")]
    document_root: Option<PathBuf>,

    /// Root directory of the tree; a leading "/" is relative to the
    /// document root (default: the document root).
    #[arg(short, long)]
    base: Option<String>,

    /// Directory of the current page; "ALL" or empty selects nothing, a
    /// leading "/" is relative to the document root.
    #[arg(short, long)]
    open: Option<String>,

    /// Levels to descend below the base; negative means unlimited.
    #[arg(long, allow_hyphen_values = true)]
    depth: Option<i32>,

    /// Skip the disk cache and rebuild the tree.
    #[arg(long)]
    no_cache: bool,

    /// HTTP Cache-Control request header; "no-cache" skips the disk cache.
    #[arg(long, env = "HTTP_CACHE_CONTROL", hide = true)]
    cache_control: Option<String>,
}

/// Loaded configuration and site, with paths resolved.
pub(crate) struct SiteContext {
    pub(crate) config: Config,
    pub(crate) site: Site,
    pub(crate) document_root: PathBuf,
    pub(crate) base: PathBuf,
    pub(crate) open: Option<PathBuf>,
    pub(crate) load_options: LoadOptions,
}

impl SiteArgs {
    /// Load configuration and build the site context.
    ///
    /// `settings` carries command-specific overrides; the shared fields are
    /// filled in here.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails or a path cannot be
    /// made absolute.
    pub(crate) fn context(&self, settings: CliSettings) -> Result<SiteContext, CliError> {
        let settings = CliSettings {
            document_root: self.document_root.clone(),
            depth_limit: self.depth,
            ..settings
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let document_root = std::path::absolute(&config.document_root)?;
        let base = match self.base.as_deref() {
            Some(base) => resolve_path(base, &document_root)?,
            None => document_root.clone(),
        };
        let open = resolve_open(self.open.as_deref(), &document_root)?;

        let no_cache =
            self.no_cache || LoadOptions::no_cache_directive(self.cache_control.as_deref());
        let load_options = LoadOptions {
            depth_limit: config.tree.depth_limit,
            no_cache,
            ..LoadOptions::default()
        };

        let site = Site::new(Arc::new(FsExtractor), site_config(&config));

        tracing::debug!(
            base = %base.display(),
            open = ?open,
            no_cache,
            "resolved site context"
        );

        Ok(SiteContext {
            config,
            site,
            document_root,
            base,
            open,
            load_options,
        })
    }
}

impl SiteContext {
    /// Load the tree rooted at the base directory.
    ///
    /// Returns `None` if the base is not a content directory.
    pub(crate) fn tree(&self) -> Option<Arc<Node>> {
        let tree = self.site.load(&self.base, &self.load_options);
        if tree.is_none() {
            tracing::debug!(base = %self.base.display(), "base is not a content directory");
        }
        tree
    }

    /// Menu markup settings from configuration.
    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            list_type: self.config.menu.list_type.clone(),
            style: self.config.menu.style.clone(),
            document_root: self.document_root.clone(),
        }
    }
}

fn site_config(config: &Config) -> SiteConfig {
    SiteConfig {
        cache_enabled: config.cache.enabled,
        max_age: config.cache.max_age(),
        cache_file_name: config.cache.file_name.clone(),
        max_nodes: config.cache.max_nodes,
        index_file: config.tree.index_file.clone(),
        hidden_marker: config.tree.hidden_marker.clone(),
    }
}

/// Terminate an answer with a newline; no answer prints nothing.
fn line(answer: Option<String>) -> String {
    answer.map(|text| text + "\n").unwrap_or_default()
}

/// Resolve a path argument; a leading `/` is relative to `root`.
fn resolve_path(value: &str, root: &Path) -> std::io::Result<PathBuf> {
    match value.strip_prefix('/') {
        Some(rest) => Ok(root.join(rest)),
        None => std::path::absolute(value),
    }
}

/// Resolve the open path argument, mapping "ALL" and empty to no selection.
fn resolve_open(value: Option<&str>, root: &Path) -> std::io::Result<Option<PathBuf>> {
    match value {
        None | Some("" | OPEN_ALL) => Ok(None),
        Some(value) => resolve_path(value, root).map(Some),
    }
}
