//! Media extraction from document packages
//!
//! A `.docx` file is a ZIP container; embedded binary assets live under the
//! `word/media/` prefix. Extraction copies only those entries, keeping their
//! internal relative layout beneath the destination directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

/// Internal archive path prefix under which the package stores embedded media.
pub const MEDIA_PREFIX: &str = "word/media/";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open package {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt archive {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Extract every entry under [`MEDIA_PREFIX`] from the package at `package`
/// into `destination`, creating the destination and any intermediate
/// directories.
///
/// Returns the paths of the extracted files. A package without media entries
/// extracts nothing and is not an error; a file that is not a readable ZIP
/// archive is [`ArchiveError::Corrupt`].
pub fn extract_media(package: &Path, destination: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let file = File::open(package).map_err(|source| ArchiveError::Open {
        path: package.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| ArchiveError::Corrupt {
        path: package.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(destination).map_err(|source| ArchiveError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ArchiveError::Corrupt {
                path: package.to_path_buf(),
                source,
            })?;
        if entry.is_dir() || !entry.name().starts_with(MEDIA_PREFIX) {
            continue;
        }
        // entries with unsafe stored paths are skipped rather than extracted
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };

        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ArchiveError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut output = File::create(&target).map_err(|source| ArchiveError::Write {
            path: target.clone(),
            source,
        })?;
        io::copy(&mut entry, &mut output).map_err(|source| ArchiveError::Write {
            path: target.clone(),
            source,
        })?;
        extracted.push(target);
    }

    Ok(extracted)
}
