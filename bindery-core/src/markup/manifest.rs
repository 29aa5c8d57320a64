//! Package document: metadata, manifest, spine and guide

use super::{escape, NCX_HREF, STYLESHEET_HREF};
use crate::types::{Asset, Chapter, Image, ProjectMeta};

/// How the package points at its cover image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverLinkage {
    /// `<meta name="cover" content="..."/>` in the metadata block
    #[default]
    MetaTag,

    /// `properties="cover-image"` on the cover's manifest item
    ItemProperty,
}

/// Inputs to [`package_document`] beyond the assets themselves
#[derive(Debug, Clone, Copy)]
pub struct PackageInfo<'a> {
    pub meta: &'a ProjectMeta,
    pub identifier: &'a str,
    pub cover: Option<&'a Image>,
    pub cover_linkage: CoverLinkage,
}

/// Render the package document.
///
/// Every chapter and image becomes a manifest item whose id and href are its
/// archive path. Spine and guide list chapters only, in reading order.
pub fn package_document(chapters: &[&Chapter], images: &[Image], info: &PackageInfo<'_>) -> String {
    let language = escape(info.meta.language());

    let mut metadata = String::new();
    metadata.push_str(&format!(
        "    <dc:identifier id=\"uid\">{}</dc:identifier>\n",
        escape(info.identifier)
    ));
    metadata.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape(info.meta.title())
    ));
    metadata.push_str(&format!("    <dc:language>{language}</dc:language>\n"));
    metadata.push_str(&format!(
        "    <dc:creator>{}</dc:creator>\n",
        escape(info.meta.author())
    ));
    if let (Some(cover), CoverLinkage::MetaTag) = (info.cover, info.cover_linkage) {
        metadata.push_str(&format!(
            "    <meta name=\"cover\" content=\"{}\"/>\n",
            escape(cover.path())
        ));
    }

    let mut items = String::new();
    items.push_str(&format!(
        "    <item href=\"{NCX_HREF}\" id=\"ncx\" media-type=\"application/x-dtbncx+xml\"/>\n"
    ));
    items.push_str(&format!(
        "    <item href=\"{STYLESHEET_HREF}\" id=\"{STYLESHEET_HREF}\" media-type=\"text/css\"/>\n"
    ));
    for chapter in chapters {
        items.push_str(&manifest_item(*chapter, None));
    }
    for image in images {
        items.push_str(&manifest_item(image, None));
    }
    if let Some(cover) = info.cover {
        let properties = match info.cover_linkage {
            CoverLinkage::ItemProperty => Some("cover-image"),
            CoverLinkage::MetaTag => None,
        };
        items.push_str(&manifest_item(cover, properties));
    }

    let mut itemrefs = String::new();
    let mut references = String::new();
    for chapter in chapters {
        let path = escape(&chapter.path);
        itemrefs.push_str(&format!("    <itemref idref=\"{path}\"/>\n"));
        references.push_str(&format!(
            "    <reference href=\"{path}\" title=\"{}\" type=\"bodymatter\"/>\n",
            escape(chapter.title.as_deref().unwrap_or_default())
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" dir="ltr" unique-identifier="uid" version="3.0" xml:lang="{language}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:opf="http://www.idpf.org/2007/opf">
{metadata}  </metadata>
  <manifest>
{items}  </manifest>
  <spine toc="ncx">
{itemrefs}  </spine>
  <guide>
{references}  </guide>
</package>
"#
    )
}

fn manifest_item(asset: &dyn Asset, properties: Option<&str>) -> String {
    let path = escape(asset.path());
    let properties = properties
        .map(|p| format!(" properties=\"{p}\""))
        .unwrap_or_default();
    format!(
        "    <item href=\"{path}\" id=\"{path}\" media-type=\"{}\"{properties}/>\n",
        escape(asset.mime_type())
    )
}
