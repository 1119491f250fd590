//! Directory flattening
//!
//! Collapses a directory tree so that every contained file sits directly in
//! the top-level directory, renaming on collision and removing the emptied
//! subdirectories.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Move every file found at any depth in `directory`'s subtree to its top
/// level, then remove the now-empty subdirectories.
///
/// When a target filename is already taken, `_1`, `_2`, … is inserted before
/// the extension until a free name is found. Files already at the top level
/// are left untouched, so flattening an already-flat directory is a no-op.
pub fn flatten(directory: &Path) -> Result<()> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1) {
        let entry = entry.with_context(|| format!("failed to walk {}", directory.display()))?;
        if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        } else if entry.depth() > 1 {
            files.push(entry.into_path());
        }
    }

    for source in files {
        let file_name = source
            .file_name()
            .with_context(|| format!("no file name in {}", source.display()))?;
        let target = collision_free_target(directory, file_name);
        fs::rename(&source, &target).with_context(|| {
            format!(
                "failed to move {} to {}",
                source.display(),
                target.display()
            )
        })?;
    }

    // deepest first, so each directory is empty by the time it is removed
    subdirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    for dir in subdirs {
        fs::remove_dir(&dir).with_context(|| format!("failed to remove {}", dir.display()))?;
    }

    Ok(())
}

/// First free path for `file_name` in `directory`, trying `name_1.ext`,
/// `name_2.ext`, … when the plain name is taken.
fn collision_free_target(directory: &Path, file_name: &OsStr) -> PathBuf {
    let mut target = directory.join(file_name);
    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = crate::naming::dotted_extension(name);

    let mut attempt = 0;
    while target.exists() {
        attempt += 1;
        target = directory.join(format!("{stem}_{attempt}{extension}"));
    }
    target
}
