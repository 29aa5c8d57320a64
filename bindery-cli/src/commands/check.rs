//! Check command implementation

use super::build::{prepare, BuildArgs};
use anyhow::{bail, Result};
use std::path::Path;

/// Run every build phase except writing
pub fn check(project: &Path, strict: bool, args: &BuildArgs) -> Result<()> {
    let package = prepare(project, args)?;

    if strict && !package.diagnostics().is_empty() {
        bail!(
            "{} document(s) failed validation in {}",
            package.diagnostics().len(),
            project.display()
        );
    }

    println!(
        "OK: '{}' ({} chapters, {} images, {} entries)",
        package.title,
        package.chapter_count,
        package.image_count,
        package.entries().len()
    );
    Ok(())
}
