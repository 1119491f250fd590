//! Per-document extraction pipeline
//!
//! Drives one document through conversion, media extraction, flattening, and
//! renaming. Each document is an isolated unit of work: a failure is returned
//! to the caller and never aborts the rest of the batch. The input file is
//! never modified; the only temporary artifact is the converted `.docx` for
//! legacy inputs, removed again on both success and failure.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::convert;
use crate::extract;
use crate::flatten::flatten;
use crate::metadata;
use crate::naming;

/// What one document produced
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub export_dir: PathBuf,
    pub author: Option<String>,
    pub topic_title: Option<String>,
    /// Final image filenames, in index order
    pub images: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Create export directories under this root instead of next to the input
    pub export_root: Option<PathBuf>,
    /// Look up author and topic title from the main document part
    pub read_metadata: bool,
}

/// Aggregated outcome of a batch run
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub processed: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Run the full pipeline on a single document.
///
/// Legacy `.doc` inputs are converted to a temporary sibling `.docx` first;
/// the temporary package is deleted before this function returns, whatever
/// the outcome.
pub fn process_document(
    input: &Path,
    config: &Config,
    options: &PipelineOptions,
) -> Result<DocumentReport> {
    let is_legacy = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("doc"));

    let (package, temporary) = if is_legacy {
        (convert::convert_to_docx(input, &config.converter)?, true)
    } else {
        (input.to_path_buf(), false)
    };

    let outcome = extract_and_rename(input, &package, config, options);

    if temporary {
        let removed = fs::remove_file(&package);
        if outcome.is_ok() {
            removed.with_context(|| {
                format!("failed to remove temporary package {}", package.display())
            })?;
        }
    }

    outcome
}

fn extract_and_rename(
    input: &Path,
    package: &Path,
    config: &Config,
    options: &PipelineOptions,
) -> Result<DocumentReport> {
    let stem = package
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("input file has no usable name: {}", package.display()))?;

    let export_dir = match &options.export_root {
        Some(root) => root.join(&stem),
        None => package.parent().unwrap_or(Path::new("")).join(&stem),
    };
    // an export directory belongs to the run that created it
    if export_dir.exists() {
        bail!("export directory {} already exists", export_dir.display());
    }

    let mut warnings = Vec::new();
    let mut author = None;
    let mut topic_title = None;
    if options.read_metadata {
        match metadata::read_package_info(package) {
            Ok(info) => {
                author = info.author;
                topic_title = info.topic_title;
            }
            Err(err) => warnings.push(format!("metadata lookup failed: {err:#}")),
        }
    }

    extract::extract_media(package, &export_dir)
        .with_context(|| format!("failed to extract media from {}", package.display()))?;

    flatten(&export_dir).with_context(|| format!("failed to flatten {}", export_dir.display()))?;

    let images = rename_exports(&export_dir, &stem, config)?;

    Ok(DocumentReport {
        source: input.to_path_buf(),
        export_dir,
        author,
        topic_title,
        images,
        warnings,
    })
}

/// Rename every file in the flattened export directory to the naming
/// convention, with a 1-based index following sorted file-name order.
fn rename_exports(export_dir: &Path, stem: &str, config: &Config) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(export_dir)
        .with_context(|| format!("failed to read {}", export_dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut images = Vec::new();
    for (position, file) in files.iter().enumerate() {
        let extension = naming::dotted_extension(file);
        let name = config.naming.export_name(stem, position + 1, &extension);
        fs::rename(file, export_dir.join(&name))
            .with_context(|| format!("failed to rename {}", file.display()))?;
        images.push(name);
    }

    Ok(images)
}
