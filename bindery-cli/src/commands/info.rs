//! Info command implementation

use anyhow::{Context, Result};
use bindery_core::read_package;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Package info output
#[derive(Serialize)]
struct PackageInfo {
    title: String,
    author: String,
    language: String,
    identifier: String,
    chapters: usize,
    items: usize,
    cover: Option<String>,
}

/// Display information about a built package
pub fn info(input: &Path, json: bool) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    let summary = read_package(BufReader::new(file))
        .with_context(|| format!("Failed to read package {}", input.display()))?;

    let info = PackageInfo {
        chapters: summary.spine.len(),
        items: summary.items.len(),
        cover: summary.cover,
        title: summary.title,
        author: summary.author,
        language: summary.language,
        identifier: summary.identifier,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:      {}", info.title);
        if !info.author.is_empty() {
            println!("Author:     {}", info.author);
        }
        println!("Language:   {}", info.language);
        println!("Identifier: {}", info.identifier);
        println!("Chapters:   {}", info.chapters);
        println!("Items:      {}", info.items);
        if let Some(cover) = &info.cover {
            println!("Cover:      {}", cover);
        }
    }

    Ok(())
}
