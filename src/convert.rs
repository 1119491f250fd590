//! Legacy `.doc` conversion via the external office converter
//!
//! The converter is a desktop-suite executable invoked synchronously with the
//! source and destination paths. It reports success through the output file
//! rather than its exit code, so a silently failed conversion surfaces
//! downstream when the expected `.docx` cannot be opened.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::config::ConverterConfig;

/// Convert a legacy document to a sibling `.docx` with the same stem and
/// return the target path.
///
/// A stale file already at the target path is deleted before the converter
/// runs, so the tool never writes over an open target.
pub fn convert_to_docx(source: &Path, converter: &ConverterConfig) -> Result<PathBuf> {
    let target = source.with_extension("docx");
    if target.exists() {
        fs::remove_file(&target)
            .with_context(|| format!("failed to remove stale {}", target.display()))?;
    }

    let display_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Converting {display_name} to .docx"));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let program =
        locate_converter(converter).unwrap_or_else(|| PathBuf::from(&converter.executable));
    let _ = Command::new(program)
        .arg("-oice")
        .arg("-nme")
        .arg(source)
        .arg(&target)
        .status()
        .with_context(|| format!("failed to run converter {}", converter.executable))?;

    spinner.finish_with_message(format!("Converting {display_name} to .docx ...complete"));
    Ok(target)
}

/// Resolve the converter executable: the configured installation directory
/// first, then each entry of the process `PATH`.
pub fn locate_converter(converter: &ConverterConfig) -> Option<PathBuf> {
    let file_name = executable_file_name(&converter.executable);

    let installed = converter.search_dir.join(&file_name);
    if installed.is_file() {
        return Some(installed);
    }

    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

fn executable_file_name(name: &str) -> String {
    if cfg!(windows) && !name.to_ascii_lowercase().ends_with(".exe") {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}
