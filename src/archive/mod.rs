//! Bundle archive extraction.
//!
//! The loader treats the container codec as a black box behind
//! [`ArchiveExtractor`]. [`TarGzExtractor`] is the stock implementation.

pub mod tar_gz;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::defaults::EXTRACT_DIR_SUFFIX;

pub use tar_gz::TarGzExtractor;

/// Errors raised while unpacking a bundle archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Bundle archive not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Unsafe path in archive: {0}")]
    UnsafePath(String),

    #[error("IO error while extracting: {0}")]
    Io(#[from] std::io::Error),
}

/// Unpacks a container file into a directory tree.
///
/// Implementations create `destination` if needed and leave the archive's
/// full file tree under it on success.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, source: &Path, destination: &Path) -> Result<(), ExtractError>;
}

/// Scratch directory used while loading `source`: `<root>/<stem>-extract`.
///
/// Two sources with the same stem map to the same directory.
pub fn scratch_dir_for(extract_root: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    extract_root.join(format!("{}{}", stem, EXTRACT_DIR_SUFFIX))
}
