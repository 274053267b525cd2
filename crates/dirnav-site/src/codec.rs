//! Line-oriented text encoding of node trees for the disk cache.
//!
//! Each node is three lines, written in preorder and preceded by a
//! diagnostic comment:
//!
//! ```text
//! # Node 0
//! /srv/www
//! Home
//! 0 2
//! # Node 1
//! /srv/www/about
//! About us
//! 1 0
//! ...
//! ```
//!
//! The third line holds the hidden flag (`0`/`1`) and the number of child
//! records that follow before the parent's next sibling.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::node::{Node, sort_by_title};

/// Default cap on nodes written by a single [`encode`] call.
pub const DEFAULT_MAX_NODES: usize = 2000;

/// Prefix of comment lines.
const COMMENT: char = '#';

/// Deepest nesting accepted by [`decode`]; the root is depth 0.
pub const MAX_DECODE_DEPTH: usize = 256;

/// Outcome of an [`encode`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Nodes actually written.
    pub written: usize,
    /// True if the node cap stopped the output early.
    pub truncated: bool,
}

/// Error returned when cache text cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input ended in the middle of a node record.
    #[error("Unexpected end of input at line {line}: expected {expected}")]
    UnexpectedEof {
        /// Line number where the missing line was expected (1-based).
        line: usize,
        /// Which field was expected.
        expected: &'static str,
    },
    /// A line did not match the record grammar.
    #[error("Malformed line {line}: expected {expected}, got {found:?}")]
    Malformed {
        /// Line number (1-based).
        line: usize,
        /// Which field was expected.
        expected: &'static str,
        /// The offending line.
        found: String,
    },
    /// Records nest deeper than [`MAX_DECODE_DEPTH`].
    #[error("Nesting exceeds {max} levels at line {line}")]
    TooDeep {
        /// Line number of the first record past the limit (1-based).
        line: usize,
        /// Maximum accepted depth.
        max: usize,
    },
    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Write `tree` to `sink`, stopping after `max_nodes` nodes.
///
/// When the cap is reached a `# Got too many nodes` marker replaces the
/// remaining records; the result then no longer decodes, which readers treat
/// as a cache miss.
///
/// # Errors
///
/// Returns `InvalidInput` if a path is not UTF-8 or a path or title
/// contains a line break, or any error from `sink`.
pub fn encode<W: Write>(tree: &Node, sink: &mut W, max_nodes: usize) -> io::Result<EncodeSummary> {
    let mut encoder = Encoder {
        sink,
        max_nodes,
        summary: EncodeSummary {
            written: 0,
            truncated: false,
        },
    };
    encoder.write_node(tree)?;
    Ok(encoder.summary)
}

struct Encoder<'w, W: Write> {
    sink: &'w mut W,
    max_nodes: usize,
    summary: EncodeSummary,
}

impl<W: Write> Encoder<'_, W> {
    fn write_node(&mut self, node: &Node) -> io::Result<()> {
        if self.summary.written >= self.max_nodes {
            if !self.summary.truncated {
                writeln!(self.sink, "{COMMENT} Got too many nodes: {}", self.summary.written)?;
                self.summary.truncated = true;
            }
            return Ok(());
        }

        let path = node
            .path
            .to_str()
            .ok_or_else(|| invalid_field("path is not valid UTF-8"))?;
        if has_line_break(path) {
            return Err(invalid_field("path contains a line break"));
        }
        if has_line_break(&node.title) {
            return Err(invalid_field("title contains a line break"));
        }

        writeln!(self.sink, "{COMMENT} Node {}", self.summary.written)?;
        writeln!(self.sink, "{path}")?;
        writeln!(self.sink, "{}", node.title)?;
        writeln!(self.sink, "{} {}", u8::from(node.hidden), node.children.len())?;
        self.summary.written += 1;

        for child in &node.children {
            self.write_node(child)?;
        }
        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

fn invalid_field(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

/// Read a tree from `source`.
///
/// Returns `Ok(None)` if the source holds no records (empty or comments
/// only). Content after the root's last descendant is ignored. Children are
/// re-sorted by title, so the result holds the same order a fresh build
/// would produce whatever order the file stores.
///
/// # Errors
///
/// Returns [`DecodeError`] if a record is incomplete or malformed, or if
/// records nest deeper than [`MAX_DECODE_DEPTH`].
pub fn decode<R: BufRead>(source: R) -> Result<Option<Node>, DecodeError> {
    let mut decoder = Decoder {
        lines: source.lines(),
        line: 0,
    };

    match decoder.next_record_start()? {
        Some(path) => decoder.read_node(path, 0).map(Some),
        None => Ok(None),
    }
}

struct Decoder<R: BufRead> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Decoder<R> {
    fn next_line(&mut self) -> Result<Option<String>, DecodeError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    /// Skip comment lines and return the first line of the next record.
    fn next_record_start(&mut self) -> Result<Option<String>, DecodeError> {
        while let Some(line) = self.next_line()? {
            if !line.starts_with(COMMENT) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn expect_line(&mut self, expected: &'static str) -> Result<String, DecodeError> {
        let line = self.next_line()?.ok_or(DecodeError::UnexpectedEof {
            line: self.line + 1,
            expected,
        })?;
        if line.is_empty() {
            return Err(self.malformed(expected, line));
        }
        Ok(line)
    }

    fn read_node(&mut self, path: String, depth: usize) -> Result<Node, DecodeError> {
        if path.is_empty() {
            return Err(self.malformed("path", path));
        }
        if depth > MAX_DECODE_DEPTH {
            return Err(DecodeError::TooDeep {
                line: self.line,
                max: MAX_DECODE_DEPTH,
            });
        }
        let title = self.expect_line("title")?;
        let counts = self.expect_line("hidden flag and child count")?;
        let (hidden, child_count) = self.parse_counts(&counts)?;

        let mut children = Vec::with_capacity(child_count.min(DEFAULT_MAX_NODES));
        for _ in 0..child_count {
            let child_path = self.next_record_start()?.ok_or(DecodeError::UnexpectedEof {
                line: self.line + 1,
                expected: "child path",
            })?;
            children.push(self.read_node(child_path, depth + 1)?);
        }

        sort_by_title(&mut children);
        Ok(Node {
            path: PathBuf::from(path),
            title,
            hidden,
            children,
        })
    }

    fn parse_counts(&self, line: &str) -> Result<(bool, usize), DecodeError> {
        const EXPECTED: &str = "\"<0|1> <child count>\"";

        let mut fields = line.split_ascii_whitespace();
        let hidden = match fields.next() {
            Some("0") => false,
            Some("1") => true,
            _ => return Err(self.malformed(EXPECTED, line.to_owned())),
        };
        let Some(count) = fields.next().and_then(|f| f.parse::<usize>().ok()) else {
            return Err(self.malformed(EXPECTED, line.to_owned()));
        };
        if fields.next().is_some() {
            return Err(self.malformed(EXPECTED, line.to_owned()));
        }
        Ok((hidden, count))
    }

    fn malformed(&self, expected: &'static str, found: String) -> DecodeError {
        DecodeError::Malformed {
            line: self.line,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use std::fs;

    use dirnav_extract::FsExtractor;

    use super::*;
    use crate::builder::TreeBuilder;
    use crate::builder::tests::page;
    use crate::navigation::locate_by_title;
    use crate::node::tests::{hidden, node};

    fn encode_to_string(tree: &Node, max_nodes: usize) -> (String, EncodeSummary) {
        let mut buf = Vec::new();
        let summary = encode(tree, &mut buf, max_nodes).unwrap();
        (String::from_utf8(buf).unwrap(), summary)
    }

    fn decode_str(text: &str) -> Result<Option<Node>, DecodeError> {
        decode(text.as_bytes())
    }

    fn sample_tree() -> Node {
        node(
            "/www",
            "Home",
            vec![
                node(
                    "/www/products",
                    "Products",
                    vec![
                        node("/www/products/b", "Bolts", Vec::new()),
                        node("/www/products/a", "Anchors", Vec::new()),
                    ],
                ),
                hidden("/www/staff", "# Staff only", Vec::new()),
                node("/www/about", "About us", Vec::new()),
            ],
        )
    }

    #[test]
    fn test_encode_format() {
        let tree = node("/www", "Home", vec![hidden("/www/a", "A", Vec::new())]);

        let (text, summary) = encode_to_string(&tree, DEFAULT_MAX_NODES);

        assert_eq!(
            text,
            "# Node 0\n/www\nHome\n0 1\n# Node 1\n/www/a\nA\n1 0\n"
        );
        assert_eq!(
            summary,
            EncodeSummary {
                written: 2,
                truncated: false
            }
        );
    }

    #[test]
    fn test_round_trip() {
        let tree = sample_tree();

        let (text, _) = encode_to_string(&tree, DEFAULT_MAX_NODES);
        let decoded = decode_str(&text).unwrap().unwrap();

        assert_eq!(decoded, tree);
        assert!(decoded.is_sorted());
    }

    #[test]
    fn test_title_starting_with_comment_marker_survives() {
        let tree = node("/www", "#1 Choice", Vec::new());

        let (text, _) = encode_to_string(&tree, DEFAULT_MAX_NODES);

        assert_eq!(decode_str(&text).unwrap().unwrap().title, "#1 Choice");
    }

    #[test]
    fn test_encode_cap_is_shared_across_subtrees() {
        let tree = sample_tree();

        let (text, summary) = encode_to_string(&tree, 3);

        assert_eq!(summary.written, 3);
        assert!(summary.truncated);
        assert_eq!(text.matches("# Got too many nodes: 3").count(), 1);
        assert!(text.contains("/www/about\n"));
        assert!(!text.contains("/www/products"));
    }

    #[test]
    fn test_encode_cap_is_per_call() {
        let tree = sample_tree();

        let (_, first) = encode_to_string(&tree, DEFAULT_MAX_NODES);
        let (_, second) = encode_to_string(&tree, DEFAULT_MAX_NODES);

        assert_eq!(first, second);
        assert_eq!(second.written, 6);
    }

    #[test]
    fn test_truncated_output_does_not_decode() {
        let (text, _) = encode_to_string(&sample_tree(), 2);

        assert!(matches!(
            decode_str(&text),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_line_breaks() {
        let tree = node("/www", "Two\nlines", Vec::new());

        let err = encode(&tree, &mut Vec::new(), DEFAULT_MAX_NODES).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_decode_empty_input_is_no_tree() {
        assert!(decode_str("").unwrap().is_none());
        assert!(decode_str("# Cache path: /www/.cache\n").unwrap().is_none());
    }

    #[test]
    fn test_decode_skips_comments_between_records() {
        let text = "# header\n# more\n/www\nHome\n0 1\n# Node 1\n# extra\n/www/a\nA\n0 0\n";

        let tree = decode_str(text).unwrap().unwrap();

        assert_eq!(tree.children[0].title, "A");
    }

    #[test]
    fn test_decode_missing_title() {
        let err = decode_str("/www\n").unwrap_err();

        assert!(matches!(
            err,
            DecodeError::UnexpectedEof {
                expected: "title",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_empty_title_line() {
        assert!(matches!(
            decode_str("/www\n\n0 0\n"),
            Err(DecodeError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_decode_malformed_counts() {
        for counts in ["x 0", "0", "0 -1", "2 0", "0 1 2", "0 one"] {
            let text = format!("/www\nHome\n{counts}\n");
            assert!(
                matches!(decode_str(&text), Err(DecodeError::Malformed { line: 3, .. })),
                "{counts:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_missing_children() {
        let err = decode_str("/www\nHome\n0 2\n/www/a\nA\n0 0\n").unwrap_err();

        assert!(matches!(
            err,
            DecodeError::UnexpectedEof {
                expected: "child path",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_restores_title_order() {
        let tree = decode_str("/www\nHome\n0 2\n/www/b\nB\n0 0\n/www/a\nA\n0 0\n")
            .unwrap()
            .unwrap();

        assert_eq!(tree.children[0].title, "A");
        assert!(tree.is_sorted());
    }

    #[test]
    fn test_decode_equal_titles_match_fresh_build_order() {
        let stored = "/www\nHome\n0 2\n/www/z\nContact\n0 0\n/www/a\nContact\n0 0\n";
        let built = node(
            "/www",
            "Home",
            vec![
                node("/www/z", "Contact", Vec::new()),
                node("/www/a", "Contact", Vec::new()),
            ],
        );

        let decoded = decode_str(stored).unwrap().unwrap();

        assert!(decoded.is_sorted());
        assert_eq!(decoded, built);
        assert_eq!(
            locate_by_title(&decoded, "contact").unwrap().path,
            PathBuf::from("/www/a")
        );
    }

    #[test]
    fn test_decode_deep_chain_is_rejected() {
        let mut text = String::new();
        for i in 0..100_000 {
            text.push_str(&format!("/p{i}\nT\n0 1\n"));
        }

        let err = decode_str(&text).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::TooDeep {
                max: MAX_DECODE_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_accepts_max_depth() {
        let mut text = String::new();
        for i in 0..MAX_DECODE_DEPTH {
            text.push_str(&format!("/p{i}\nT\n0 1\n"));
        }
        text.push_str("/leaf\nLeaf\n0 0\n");

        let tree = decode_str(&text).unwrap().unwrap();

        assert_eq!(tree.len(), MAX_DECODE_DEPTH + 1);
    }

    #[test]
    fn test_round_trip_built_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("www");
        page(&root, "Home");
        page(&root.join("products"), "Products");
        page(&root.join("products/bolts"), "Bolts");
        page(&root.join("products/anchors"), "Anchors");
        page(&root.join("products/anchors/wall"), "Wall");
        page(&root.join("staff"), "Staff");
        fs::write(root.join("staff/.hidden"), "").unwrap();
        page(&root.join("staff/payroll"), "Payroll");
        page(&root.join("sales/contact"), "Contact");
        page(&root.join("sales"), "Sales");
        page(&root.join("support/contact"), "Contact");
        page(&root.join("support"), "Support");
        page(&root.join("zz-contact"), "Contact");
        page(&root.join("aa-contact"), "Contact");
        let tree = TreeBuilder::new(&FsExtractor).build(&root, -1).unwrap();

        let (text, summary) = encode_to_string(&tree, DEFAULT_MAX_NODES);
        let decoded = decode_str(&text).unwrap().unwrap();

        assert!(!summary.truncated);
        assert_eq!(summary.written, tree.len());
        assert_eq!(decoded, tree);
        assert!(decoded.is_sorted());
        assert!(decoded.find(&root.join("staff")).unwrap().hidden);
    }

    #[test]
    fn test_decode_ignores_trailing_records() {
        let tree = decode_str("/www\nHome\n0 0\n/extra\nExtra\n0 0\n")
            .unwrap()
            .unwrap();

        assert_eq!(tree.len(), 1);
    }
}
