//! Section extraction from index documents.
//!
//! The directory tree only needs one thing from document content: the text
//! of a named markup section (usually `title`) in a directory's index
//! document. This crate provides that operation behind the
//! [`SectionExtractor`] trait so tree building can be tested and reused
//! independently of how documents are stored.
//!
//! # Implementations
//!
//! - [`FsExtractor`]: Reads the document from the local filesystem
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dirnav_extract::{FsExtractor, SectionExtractor};
//!
//! let extractor = FsExtractor;
//! match extractor.extract_section(Path::new("/var/www/index.html"), "title") {
//!     Ok(title) => println!("{title}"),
//!     Err(e) if e.is_not_found() => println!("not a page"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod fs;

use std::path::{Path, PathBuf};

pub use fs::FsExtractor;

/// Extracts the inner text of a named markup section from a document.
pub trait SectionExtractor: Send + Sync {
    /// Return the text between `<section ...>` and `</section>` in the
    /// document at `path`.
    ///
    /// The lower-case marker is tried first, then the upper-cased spelling.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the document
    /// * `section` - Section (element) name, e.g. `"title"`
    fn extract_section(&self, path: &Path, section: &str) -> Result<String, ExtractError>;
}

/// Error returned when a section cannot be extracted.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document has no complete section with that name.
    #[error("Section <{section}> not found in {}", path.display())]
    NotFound {
        /// Document path.
        path: PathBuf,
        /// Requested section name.
        section: String,
    },
    /// The document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// True when the document was readable but lacked the section.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(path: &Path, section: &str) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
            section: section.to_owned(),
        }
    }
}
