//! Author and topic-title lookups on the main document part
//!
//! The main document XML carries the author in an `Author` element and the
//! topic title as the text runs of the first paragraph styled `Heading1`.
//! Both lookups are optional: a document without them yields `None` rather
//! than an error. Namespace prefixes vary between package flavors, so
//! elements are matched by local name.

use anyhow::{Result, anyhow};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;

/// Archive path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

const HEADING_STYLE: &str = "Heading1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub author: Option<String>,
    pub topic_title: Option<String>,
}

/// Read [`DocumentInfo`] from the main document part of the package at
/// `package`. A package without a main document part yields the empty info.
pub fn read_package_info(package: &Path) -> Result<DocumentInfo> {
    let file = File::open(package)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = match archive.by_name(DOCUMENT_PART) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(DocumentInfo::default()),
        Err(err) => return Err(err.into()),
    };
    let mut xml = Vec::new();
    entry.read_to_end(&mut xml)?;
    read_document_info(&xml)
}

/// Parse the main document XML and return the first author and the text of
/// the first `Heading1` paragraph.
pub fn read_document_info(xml: &[u8]) -> Result<DocumentInfo> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut info = DocumentInfo::default();

    let mut in_author = false;
    let mut in_paragraph = false;
    let mut paragraph_is_heading = false;
    let mut in_run_text = false;
    let mut run_texts: Vec<String> = Vec::new();
    let mut title_found = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"Author" => in_author = true,
                b"p" => {
                    in_paragraph = true;
                    paragraph_is_heading = false;
                    run_texts.clear();
                }
                b"pStyle" => {
                    if in_paragraph && style_is_heading(e) {
                        paragraph_is_heading = true;
                    }
                }
                b"t" => {
                    if in_paragraph && paragraph_is_heading && !title_found {
                        in_run_text = true;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"pStyle"
                    && in_paragraph
                    && style_is_heading(e)
                {
                    paragraph_is_heading = true;
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|err| anyhow!("document XML parse failed: {err}"))?;
                if in_author && info.author.is_none() {
                    info.author = Some(text.into_owned());
                } else if in_run_text {
                    run_texts.push(text.into_owned());
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"Author" => in_author = false,
                b"t" => in_run_text = false,
                b"p" => {
                    if in_paragraph && paragraph_is_heading && !title_found {
                        info.topic_title = Some(run_texts.join(" "));
                        title_found = true;
                    }
                    in_paragraph = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(anyhow!("document XML parse failed: {err}")),
            _ => {}
        }

        if info.author.is_some() && title_found {
            break;
        }
    }

    Ok(info)
}

fn style_is_heading(e: &BytesStart) -> bool {
    attr_by_local_name(e, b"val").is_some_and(|value| value == HEADING_STYLE)
}

fn attr_by_local_name(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&byte| byte == b':') {
        Some(position) => &name[position + 1..],
        None => name,
    }
}
