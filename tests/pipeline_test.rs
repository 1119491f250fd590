use docpix::config::Config;
use docpix::pipeline::{PipelineOptions, process_document};
use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const GUID_PATTERN: &str =
    "GUID-[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}";

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:wordDocument xmlns:w="http://schemas.microsoft.com/office/word/2003/wordml" xmlns:o="urn:schemas-microsoft-com:office:office">
  <o:DocumentProperties><o:Author>Jane Doe</o:Author></o:DocumentProperties>
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Quarterly Report</w:t></w:r></w:p>
  </w:body>
</w:wordDocument>"#;

fn build_package(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create package file");
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start archive entry");
        writer.write_all(content).expect("Failed to write entry");
    }
    writer.finish().expect("Failed to finish archive");
}

fn two_image_entries() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("word/document.xml", DOCUMENT_XML.as_bytes()),
        ("word/media/image1.png", b"png-bytes".as_slice()),
        ("word/media/image2.jpeg", b"jpeg-bytes".as_slice()),
    ]
}

fn export_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read export directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod docx_pipeline_tests {
    use super::*;

    #[test]
    fn test_end_to_end_two_images() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Report.docx");
        build_package(&package, &two_image_entries());

        let config = Config::default();
        let options = PipelineOptions {
            read_metadata: true,
            ..Default::default()
        };
        let report = process_document(&package, &config, &options)
            .expect("Pipeline should succeed on a well-formed package");

        assert_eq!(report.export_dir, dir.path().join("Report"));
        assert_eq!(report.images.len(), 2, "Both images should survive");

        let names = export_names(&report.export_dir);
        let first = Regex::new(&format!("^c-re Report1={GUID_PATTERN}=1=en=low\\.png$")).unwrap();
        let second =
            Regex::new(&format!("^c-re Report2={GUID_PATTERN}=1=en=low\\.jpeg$")).unwrap();
        assert!(
            first.is_match(&names[0]),
            "image1.png sorts first and should get index 1, got {}",
            names[0]
        );
        assert!(
            second.is_match(&names[1]),
            "image2.jpeg sorts second and should get index 2, got {}",
            names[1]
        );
        assert_eq!(report.images, names, "Report should list the final names in index order");

        assert!(package.is_file(), "The input document must be left untouched");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_metadata_is_reported() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Titled.docx");
        build_package(&package, &two_image_entries());

        let options = PipelineOptions {
            read_metadata: true,
            ..Default::default()
        };
        let report = process_document(&package, &Config::default(), &options).unwrap();

        assert_eq!(report.author.as_deref(), Some("Jane Doe"));
        assert_eq!(report.topic_title.as_deref(), Some("Quarterly Report"));
    }

    #[test]
    fn test_metadata_lookup_can_be_skipped() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Skipped.docx");
        build_package(&package, &two_image_entries());

        let report =
            process_document(&package, &Config::default(), &PipelineOptions::default()).unwrap();

        assert_eq!(report.author, None);
        assert_eq!(report.topic_title, None);
    }

    #[test]
    fn test_nested_media_is_flattened_before_renaming() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Nested.docx");
        build_package(
            &package,
            &[
                ("word/media/image1.png", b"top".as_slice()),
                ("word/media/gallery/photo.png", b"deep".as_slice()),
            ],
        );

        let report =
            process_document(&package, &Config::default(), &PipelineOptions::default()).unwrap();

        assert_eq!(report.images.len(), 2);
        let pattern = Regex::new(&format!("^c-re Nested[12]={GUID_PATTERN}=1=en=low\\.png$")).unwrap();
        for name in &report.images {
            assert!(pattern.is_match(name), "Got {name}");
        }
        assert!(
            fs::read_dir(&report.export_dir)
                .unwrap()
                .all(|entry| entry.unwrap().file_type().unwrap().is_file()),
            "The export directory should contain only files after flattening"
        );
    }

    #[test]
    fn test_package_without_media_yields_empty_export() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Plain.docx");
        build_package(&package, &[("word/document.xml", DOCUMENT_XML.as_bytes())]);

        let report =
            process_document(&package, &Config::default(), &PipelineOptions::default()).unwrap();

        assert!(report.images.is_empty());
        assert!(report.export_dir.is_dir());
    }

    #[test]
    fn test_existing_export_directory_fails_the_document() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Report.docx");
        build_package(&package, &two_image_entries());
        fs::create_dir(dir.path().join("Report")).unwrap();

        let result = process_document(&package, &Config::default(), &PipelineOptions::default());

        let err = result.expect_err("A pre-existing export directory must not be merged into");
        assert!(
            err.to_string().contains("already exists"),
            "Unexpected error: {err:#}"
        );
    }

    #[test]
    fn test_corrupt_package_fails_the_document() {
        let dir = TempDir::new().unwrap();
        let package = dir.path().join("Broken.docx");
        fs::write(&package, b"not a zip").unwrap();

        let result = process_document(&package, &Config::default(), &PipelineOptions::default());
        assert!(result.is_err(), "A corrupt package should fail its document");
    }

    #[test]
    fn test_export_root_overrides_sibling_placement() {
        let dir = TempDir::new().unwrap();
        let exports = TempDir::new().unwrap();
        let package = dir.path().join("Report.docx");
        build_package(&package, &two_image_entries());

        let options = PipelineOptions {
            export_root: Some(exports.path().to_path_buf()),
            ..Default::default()
        };
        let report = process_document(&package, &Config::default(), &options).unwrap();

        assert_eq!(report.export_dir, exports.path().join("Report"));
        assert!(
            !dir.path().join("Report").exists(),
            "No export directory should be created next to the input"
        );
    }
}

#[cfg(unix)]
#[cfg(test)]
mod legacy_doc_tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fake_converter(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("fake-wordconv");
        fs::write(&script, body).expect("Failed to write converter script");
        let mut permissions = fs::metadata(&script).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&script, permissions).unwrap();
        script
    }

    fn config_with_converter(script: &Path) -> Config {
        let mut config = Config::default();
        config.converter.executable = script.to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_legacy_doc_leaves_no_converted_sibling_behind() {
        let dir = TempDir::new().unwrap();
        // flags come first, the source and destination paths are positional
        let script = write_fake_converter(dir.path(), "#!/bin/sh\ncp \"$3\" \"$4\"\n");

        let input = dir.path().join("Report.doc");
        build_package(&input, &two_image_entries());

        let config = config_with_converter(&script);
        let report = process_document(&input, &config, &PipelineOptions::default())
            .expect("Legacy pipeline should succeed");

        assert_eq!(report.images.len(), 2);
        assert!(
            !dir.path().join("Report.docx").exists(),
            "The temporary converted package must be deleted"
        );
        assert!(input.is_file(), "The original .doc must be left in place");
    }

    #[test]
    fn test_stale_conversion_target_is_replaced() {
        let dir = TempDir::new().unwrap();
        let script = write_fake_converter(dir.path(), "#!/bin/sh\ncp \"$3\" \"$4\"\n");

        let input = dir.path().join("Report.doc");
        build_package(&input, &two_image_entries());
        fs::write(dir.path().join("Report.docx"), b"stale garbage").unwrap();

        let config = config_with_converter(&script);
        let report = process_document(&input, &config, &PipelineOptions::default())
            .expect("A stale target must not break conversion");

        assert_eq!(report.images.len(), 2);
        assert!(!dir.path().join("Report.docx").exists());
    }

    #[test]
    fn test_silently_failing_converter_surfaces_as_open_error() {
        let dir = TempDir::new().unwrap();
        let script = write_fake_converter(dir.path(), "#!/bin/sh\nexit 1\n");

        let input = dir.path().join("Report.doc");
        build_package(&input, &two_image_entries());

        let config = config_with_converter(&script);
        let result = process_document(&input, &config, &PipelineOptions::default());

        assert!(
            result.is_err(),
            "A conversion that produced no output should fail the document downstream"
        );
        assert!(
            !dir.path().join("Report.docx").exists(),
            "No temporary artifact should be left behind on failure"
        );
    }

    #[test]
    fn test_missing_converter_fails_only_that_document() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Report.doc");
        build_package(&input, &two_image_entries());

        let mut config = Config::default();
        config.converter.executable = dir
            .path()
            .join("no-such-converter")
            .to_string_lossy()
            .into_owned();

        let result = process_document(&input, &config, &PipelineOptions::default());
        assert!(result.is_err(), "A missing converter executable is a per-document error");
    }
}
