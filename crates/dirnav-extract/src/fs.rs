//! Filesystem-backed section extraction.
//!
//! The document is scanned as raw bytes, not parsed as HTML:
//!
//! ```text
//! <title lang="en">Products</title>
//!                 ^^^^^^^^
//!                 first '>' after the marker .. start of "</title"
//! ```

use std::fs;
use std::path::Path;

use memchr::memmem;

use crate::{ExtractError, SectionExtractor};

/// [`SectionExtractor`] reading documents from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsExtractor;

impl SectionExtractor for FsExtractor {
    fn extract_section(&self, path: &Path, section: &str) -> Result<String, ExtractError> {
        let buf = fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match find_section(&buf, section) {
            Some(inner) => Ok(String::from_utf8_lossy(inner).into_owned()),
            None => {
                tracing::trace!(path = %path.display(), section, "section not found");
                Err(ExtractError::not_found(path, section))
            }
        }
    }
}

/// Locate the inner bytes of `<section ...>...</section>` in `buf`.
fn find_section<'a>(buf: &'a [u8], section: &str) -> Option<&'a [u8]> {
    let open = format!("<{section}");
    let open_at = find_marker(buf, &open)?;

    // Skip attributes up to and including the first '>'
    let after_marker = open_at + open.len();
    let gt = memchr::memchr(b'>', &buf[after_marker..])?;
    let start = after_marker + gt + 1;

    let close = format!("</{section}");
    let stop = start + find_marker(&buf[start..], &close)?;

    Some(&buf[start..stop])
}

/// Find `marker` as written, falling back to its upper-cased spelling.
fn find_marker(haystack: &[u8], marker: &str) -> Option<usize> {
    memmem::find(haystack, marker.as_bytes())
        .or_else(|| memmem::find(haystack, marker.to_ascii_uppercase().as_bytes()))
}
