//! Export naming convention for extracted images
//!
//! Every image that survives flattening is renamed to
//! `{prefix} {stem}{n}={guid}={version}={lang}=low{ext}` where `{n}` is the
//! 1-based position of the file in sorted enumeration order and `{guid}` is a
//! fresh `GUID-` tagged identifier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PREFIX: &str = "c-re";
pub const DEFAULT_VERSION: &str = "1";
pub const DEFAULT_LANG: &str = "en";

/// The fixed fields of the export filename template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingScheme {
    pub prefix: String,
    pub version: String,
    pub lang: String,
}

impl Default for NamingScheme {
    fn default() -> Self {
        NamingScheme {
            prefix: DEFAULT_PREFIX.to_string(),
            version: DEFAULT_VERSION.to_string(),
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl NamingScheme {
    /// Build the final filename for one extracted image.
    ///
    /// `extension` is the original extension including its leading dot, or an
    /// empty string for files without one.
    pub fn export_name(&self, stem: &str, index: usize, extension: &str) -> String {
        format!(
            "{} {}{}={}={}={}=low{}",
            self.prefix,
            stem,
            index,
            new_guid(),
            self.version,
            self.lang,
            extension
        )
    }
}

/// A `GUID-` tagged uppercase UUIDv4.
///
/// Uniqueness rests on the 128-bit random identifier alone; names are not
/// checked against existing files.
pub fn new_guid() -> String {
    format!("GUID-{}", Uuid::new_v4().to_string().to_uppercase())
}

/// The extension of `path` with its leading dot, or an empty string.
pub fn dotted_extension(path: &std::path::Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
