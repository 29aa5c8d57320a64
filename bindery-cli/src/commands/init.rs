//! Init command implementation

use anyhow::{bail, Context, Result};
use bindery_core::reader::{CHAPTERS_DIR, META_FILE};
use std::fs;
use std::path::Path;

/// Create a skeleton project in a new directory
pub fn init(dir: &Path) -> Result<()> {
    if dir.exists() {
        bail!("{} already exists", dir.display());
    }

    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Project directory needs a name")?;

    let chapters = dir.join(CHAPTERS_DIR);
    fs::create_dir_all(&chapters)
        .with_context(|| format!("Failed to create {}", chapters.display()))?;

    let meta = dir.join(META_FILE);
    fs::write(&meta, format!("title = {title}\nauthor = \nlanguage = en\n"))
        .with_context(|| format!("Failed to write {}", meta.display()))?;

    let first = chapters.join("0.html");
    fs::write(&first, "<h1>Chapter 1</h1>\n")
        .with_context(|| format!("Failed to write {}", first.display()))?;

    tracing::debug!("Initialized {}", dir.display());
    println!("Created project '{}' in {}", title, dir.display());
    Ok(())
}
