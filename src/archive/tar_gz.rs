//! Gzip-compressed tar bundle extraction.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use tar::Archive;

use super::{ArchiveExtractor, ExtractError};

/// Extracts `.mxrus` bundles stored as `tar.gz`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarGzExtractor;

impl TarGzExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for TarGzExtractor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<(), ExtractError> {
        if !source.is_file() {
            return Err(ExtractError::SourceNotFound(source.to_path_buf()));
        }

        fs::create_dir_all(destination)?;

        let decoder = GzDecoder::new(BufReader::new(File::open(source)?));
        let mut archive = Archive::new(decoder);

        for entry in archive.entries()? {
            let mut entry = entry?;
            let path = entry.path()?.into_owned();

            // Only plain relative components may land under the destination
            if path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
            {
                return Err(ExtractError::UnsafePath(path.to_string_lossy().into_owned()));
            }

            let dest = destination.join(&path);
            let entry_type = entry.header().entry_type();

            if entry_type.is_dir() {
                fs::create_dir_all(&dest)?;
                continue;
            }

            if !entry_type.is_file() {
                log::debug!("Skipping non-regular archive entry {:?}", path);
                continue;
            }

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(&dest)?;
            io::copy(&mut entry, &mut file)?;
        }

        Ok(())
    }
}
