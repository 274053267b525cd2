//! Read-only navigation queries over a content tree.
//!
//! Every query takes the tree and an optional *open path*, the directory of
//! the page currently displayed. `None` means nothing is selected.
//!
//! Visibility follows one rule throughout: a hidden node (and its whole
//! subtree) is skipped unless it is an ancestor-or-self of the open path.
//! The preorder sequence of visible nodes is the order used by
//! [`prev`], [`next`] and [`last`].

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use crate::node::{Node, is_ancestor_or_self};

/// Markup choices for menu rendering.
///
/// `list_type` and `style` are interpolated into the output as given; list
/// wrappers are only emitted for `ol` and `ul`.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// List element name, e.g. `ol` or `ul`.
    pub list_type: String,
    /// Inline style for list elements.
    pub style: Option<String>,
    /// Filesystem path that maps to the URL `/`.
    pub document_root: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            list_type: "ol".to_owned(),
            style: None,
            document_root: PathBuf::from("/"),
        }
    }
}

impl RenderOptions {
    fn wraps(&self) -> bool {
        matches!(self.list_type.as_str(), "ol" | "ul")
    }

    fn open_list<W: Write>(&self, w: &mut W) -> fmt::Result {
        if !self.wraps() {
            return Ok(());
        }
        match &self.style {
            Some(style) => writeln!(w, "<{} style=\"{style};\">", self.list_type),
            None => writeln!(w, "<{}>", self.list_type),
        }
    }

    fn close_list<W: Write>(&self, w: &mut W) -> fmt::Result {
        if self.wraps() {
            writeln!(w, "</{}>", self.list_type)?;
        }
        Ok(())
    }
}

fn is_open(node: &Node, open: Option<&Path>) -> bool {
    open.is_some_and(|open| is_ancestor_or_self(&node.path, open))
}

fn is_visible(node: &Node, open: Option<&Path>) -> bool {
    !node.hidden || is_open(node, open)
}

fn is_selected(node: &Node, open: Option<&Path>) -> bool {
    open.is_some_and(|open| node.path == open)
}

fn selected_attr(node: &Node, open: Option<&Path>) -> &'static str {
    if is_selected(node, open) {
        " class=\"selected\""
    } else {
        ""
    }
}

/// Render the tree as a nested list.
///
/// Children are expanded only along the open path, or everywhere when there
/// is no open path. The root is always rendered.
#[must_use]
pub fn render_menu(tree: &Node, open: Option<&Path>, options: &RenderOptions) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_menu(&mut out, tree, open, options);
    out
}

/// Streaming form of [`render_menu`].
pub fn write_menu<W: Write>(
    w: &mut W,
    tree: &Node,
    open: Option<&Path>,
    options: &RenderOptions,
) -> fmt::Result {
    options.open_list(w)?;
    write_menu_item(w, tree, open, 0, options)?;
    options.close_list(w)
}

fn write_menu_item<W: Write>(
    w: &mut W,
    node: &Node,
    open: Option<&Path>,
    level: usize,
    options: &RenderOptions,
) -> fmt::Result {
    let node_open = is_open(node, open);
    if level != 0 && node.hidden && !node_open {
        return Ok(());
    }

    write!(
        w,
        "<li class=\"level{level}\"><a{} href=\"{}\">{}</a>",
        selected_attr(node, open),
        node.url(&options.document_root),
        node.title
    )?;

    if !node.children.is_empty() && (node_open || open.is_none()) {
        writeln!(w)?;
        options.open_list(w)?;
        for child in &node.children {
            write_menu_item(w, child, open, level + 1, options)?;
        }
        options.close_list(w)?;
    }

    writeln!(w, "</li>")
}

/// Render a drill-down menu: one list per level along the open path.
///
/// The first list holds the root's children; each following list (separated
/// by `<hr>`) holds the children of the open entry of the previous one.
#[must_use]
pub fn render_submenu(tree: &Node, open: Option<&Path>, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write_submenu(&mut out, tree, open, options);
    out
}

/// Streaming form of [`render_submenu`].
pub fn write_submenu<W: Write>(
    w: &mut W,
    tree: &Node,
    open: Option<&Path>,
    options: &RenderOptions,
) -> fmt::Result {
    let mut level = tree;
    loop {
        options.open_list(w)?;
        let mut open_child = None;
        for child in level.children.iter().filter(|c| is_visible(c, open)) {
            writeln!(
                w,
                "<li><a{} href=\"{}\">{}</a></li>",
                selected_attr(child, open),
                child.url(&options.document_root),
                child.title
            )?;
            if open_child.is_none() && is_open(child, open) {
                open_child = Some(child);
            }
        }
        options.close_list(w)?;

        match open_child {
            Some(child) if !child.children.is_empty() => {
                writeln!(w, "<hr>")?;
                level = child;
            }
            _ => return Ok(()),
        }
    }
}

/// Find the first node, in preorder, whose title matches case-insensitively.
#[must_use]
pub fn locate_by_title<'a>(tree: &'a Node, title: &str) -> Option<&'a Node> {
    let wanted = title.to_lowercase();
    tree.iter().find(|node| node.title.to_lowercase() == wanted)
}

/// Parent of the node at exactly the open path.
///
/// Returns `None` for the root, an unknown path, or no open path.
#[must_use]
pub fn up<'a>(tree: &'a Node, open: Option<&Path>) -> Option<&'a Node> {
    let open = open?;
    let mut node = tree;
    loop {
        if node.path == open {
            return None;
        }
        let child = node
            .children
            .iter()
            .find(|c| is_ancestor_or_self(&c.path, open))?;
        if child.path == open {
            return Some(node);
        }
        node = child;
    }
}

/// Visible nodes in preorder.
#[must_use]
pub fn visible_sequence<'a>(tree: &'a Node, open: Option<&Path>) -> Vec<&'a Node> {
    fn collect<'a>(node: &'a Node, open: Option<&Path>, out: &mut Vec<&'a Node>) {
        if !is_visible(node, open) {
            return;
        }
        out.push(node);
        for child in &node.children {
            collect(child, open, out);
        }
    }

    let mut out = Vec::new();
    collect(tree, open, &mut out);
    out
}

/// Position of the open node in the visible sequence.
fn open_position<'a>(tree: &'a Node, open: Option<&Path>) -> Option<(Vec<&'a Node>, usize)> {
    let open_path = open?;
    let sequence = visible_sequence(tree, open);
    let idx = sequence.iter().position(|n| n.path == open_path)?;
    Some((sequence, idx))
}

/// Node immediately before the open node in the visible sequence.
#[must_use]
pub fn prev<'a>(tree: &'a Node, open: Option<&Path>) -> Option<&'a Node> {
    let (sequence, idx) = open_position(tree, open)?;
    idx.checked_sub(1).map(|i| sequence[i])
}

/// Node immediately after the open node in the visible sequence.
#[must_use]
pub fn next<'a>(tree: &'a Node, open: Option<&Path>) -> Option<&'a Node> {
    let (sequence, idx) = open_position(tree, open)?;
    sequence.get(idx + 1).copied()
}

/// Final node of the visible sequence.
///
/// Found by descending into the last visible child until a node has none.
#[must_use]
pub fn last<'a>(tree: &'a Node, open: Option<&Path>) -> Option<&'a Node> {
    if !is_visible(tree, open) {
        return None;
    }
    let mut node = tree;
    while let Some(child) = node.children.iter().rev().find(|c| is_visible(c, open)) {
        node = child;
    }
    Some(node)
}
