//! docpix: batch extractor for images embedded in Word documents
//!
//! This library provides the pieces of the extraction pipeline: converting
//! legacy `.doc` files with the external office converter, pulling media
//! entries out of the `.docx` package, flattening the extracted tree, and
//! renaming the surviving files to the export naming convention.

pub mod config;
pub mod convert;
pub mod extract;
pub mod flatten;
pub mod metadata;
pub mod naming;
pub mod pipeline;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ArchiveError, MEDIA_PREFIX, extract_media};
pub use flatten::flatten;
pub use naming::NamingScheme;
pub use pipeline::{DocumentReport, PipelineOptions, process_document};
