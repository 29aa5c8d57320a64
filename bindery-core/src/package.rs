//! Read back a packaged archive
//!
//! Follows the pointer chain a reading system would: `mimetype`, then
//! `META-INF/container.xml`, then the package document it names.

use crate::error::PackageError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use zip::ZipArchive;

type PackageResult<T> = std::result::Result<T, PackageError>;

/// One manifest item
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// What a packaged archive declares about itself
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PackageSummary {
    /// Package document path named by the container
    pub package_path: String,
    pub identifier: String,
    pub title: String,
    pub author: String,
    pub language: String,
    pub items: Vec<ManifestItem>,

    /// Spine item ids in reading order
    pub spine: Vec<String>,

    /// Href of the cover image, linked either way
    pub cover: Option<String>,
}

impl PackageSummary {
    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Spine hrefs in reading order
    pub fn spine_hrefs(&self) -> Vec<&str> {
        self.spine
            .iter()
            .filter_map(|id| self.item(id))
            .map(|i| i.href.as_str())
            .collect()
    }
}

/// Read the summary of a packaged archive
pub fn read_package<R: Read + Seek>(reader: R) -> PackageResult<PackageSummary> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| PackageError::InvalidArchive(e.to_string()))?;

    check_mimetype(&mut archive)?;

    let container = read_entry(&mut archive, "META-INF/container.xml")?;
    let package_path = find_package_path(&container)?;
    let opf = read_entry(&mut archive, &package_path)?;

    let mut summary = parse_package(&opf, &package_path)?;
    summary.package_path = package_path;
    tracing::debug!(
        "Read package '{}' with {} items",
        summary.title,
        summary.items.len()
    );
    Ok(summary)
}

fn check_mimetype<R: Read + Seek>(archive: &mut ZipArchive<R>) -> PackageResult<()> {
    let mut first = archive
        .by_index(0)
        .map_err(|_| PackageError::MissingEntry("mimetype".into()))?;
    if first.name() != "mimetype" {
        return Err(PackageError::InvalidArchive(format!(
            "first entry is {:?}, expected \"mimetype\"",
            first.name()
        )));
    }
    let mut content = String::new();
    first
        .read_to_string(&mut content)
        .map_err(|e| PackageError::InvalidArchive(e.to_string()))?;
    if content != "application/epub+zip" {
        return Err(PackageError::InvalidArchive(format!(
            "unexpected mimetype {content:?}"
        )));
    }
    Ok(())
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> PackageResult<String> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(PackageError::MissingEntry(path.to_string()))
        }
        Err(e) => return Err(PackageError::InvalidArchive(e.to_string())),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| PackageError::InvalidArchive(format!("{path}: {e}")))?;
    Ok(content)
}

fn find_package_path(container: &str) -> PackageResult<String> {
    let path = "META-INF/container.xml";
    let mut reader = Reader::from_str(container);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(|e| malformed(path, e))? {
            Event::Start(e) | Event::Empty(e) if local_name(e.name().as_ref()) == b"rootfile" => {
                if let Some(full_path) = attribute(&e, b"full-path", path)? {
                    return Ok(full_path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(PackageError::MalformedXml {
        path: path.to_string(),
        message: "no rootfile".to_string(),
    })
}

fn parse_package(content: &str, path: &str) -> PackageResult<PackageSummary> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut summary = PackageSummary::default();
    let mut cover_id: Option<String> = None;
    let mut field: Option<&'static str> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(|e| malformed(path, e))? {
            Event::Start(e) => {
                field = match local_name(e.name().as_ref()) {
                    b"identifier" => Some("identifier"),
                    b"title" => Some("title"),
                    b"creator" => Some("creator"),
                    b"language" => Some("language"),
                    _ => None,
                };
                text.clear();
            }
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"item" => {
                    let item = ManifestItem {
                        id: attribute(&e, b"id", path)?.unwrap_or_default(),
                        href: attribute(&e, b"href", path)?.unwrap_or_default(),
                        media_type: attribute(&e, b"media-type", path)?.unwrap_or_default(),
                        properties: attribute(&e, b"properties", path)?,
                    };
                    summary.items.push(item);
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref", path)? {
                        summary.spine.push(idref);
                    }
                }
                b"meta" => {
                    if attribute(&e, b"name", path)?.as_deref() == Some("cover") {
                        cover_id = attribute(&e, b"content", path)?;
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if field.is_some() {
                    let unescaped = t.unescape().map_err(|e| malformed(path, e))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(_) => {
                match field.take() {
                    Some("identifier") => summary.identifier = text.clone(),
                    Some("title") => summary.title = text.clone(),
                    Some("creator") => summary.author = text.clone(),
                    Some("language") => summary.language = text.clone(),
                    _ => {}
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    summary.cover = cover_id
        .and_then(|id| summary.item(&id))
        .or_else(|| {
            summary.items.iter().find(|i| {
                i.properties
                    .as_deref()
                    .is_some_and(|p| p.split_whitespace().any(|p| p == "cover-image"))
            })
        })
        .map(|i| i.href.clone());

    Ok(summary)
}

fn attribute(e: &BytesStart<'_>, key: &[u8], path: &str) -> PackageResult<Option<String>> {
    let Some(attr) = e.try_get_attribute(key).map_err(|e| malformed(path, e))? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(|e| malformed(path, e))?;
    Ok(Some(value.into_owned()))
}

fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

fn malformed(path: &str, e: impl std::fmt::Display) -> PackageError {
    PackageError::MalformedXml {
        path: path.to_string(),
        message: e.to_string(),
    }
}
