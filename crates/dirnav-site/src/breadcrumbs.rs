//! Breadcrumb trails from a page directory up to its site base.

use std::path::{Path, PathBuf};

use dirnav_extract::SectionExtractor;
use serde::Serialize;

use crate::builder::{normalize, read_title};
use crate::node::{is_ancestor_or_self, path_to_url};

/// One step of a breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Directory path.
    pub path: PathBuf,
}

/// Collect titled ancestors of `path`, root-first.
///
/// The walk starts at `path` itself and stops at the first directory that
/// lies outside `base` or has no title. Without a `base` it runs up to the
/// filesystem root.
#[must_use]
pub fn breadcrumbs(
    extractor: &dyn SectionExtractor,
    index_file: &str,
    path: &Path,
    base: Option<&Path>,
) -> Vec<BreadcrumbItem> {
    let mut items = Vec::new();
    let path = normalize(path);
    let mut current = Some(path.as_path());

    while let Some(dir) = current {
        if base.is_some_and(|base| !is_ancestor_or_self(base, dir)) {
            break;
        }
        let Some(title) = read_title(extractor, dir, index_file) else {
            break;
        };
        items.push(BreadcrumbItem {
            title,
            path: dir.to_path_buf(),
        });
        current = dir.parent();
    }

    items.reverse();
    items
}

/// Plain titles joined with ` / `.
#[must_use]
pub fn render_titlebar(items: &[BreadcrumbItem]) -> String {
    items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Linked titles joined with ` / `.
#[must_use]
pub fn render_navbar(items: &[BreadcrumbItem], document_root: &Path) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<a href=\"{}\">{}</a>",
                path_to_url(&item.path, document_root),
                item.title
            )
        })
        .collect::<Vec<_>>()
        .join(" / ")
}
