//! Rename command implementation

use anyhow::{Context, Result};
use bindery_core::{read_package, PackageSummary};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Rename packages to `<author> - <title>.epub` in their own directory
pub fn rename(inputs: &[PathBuf], dry_run: bool) -> Result<()> {
    let mut failures = 0;

    for input in inputs {
        let summary = match read_summary(input) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("{}: {e:#}", input.display());
                failures += 1;
                continue;
            }
        };

        let Some(name) = package_file_name(&summary) else {
            eprintln!(
                "{}: couldn't get title or author ({:?} {:?})",
                input.display(),
                summary.author,
                summary.title
            );
            failures += 1;
            continue;
        };

        let target = input.with_file_name(name);
        if target == *input {
            eprintln!("{}: same", input.display());
            continue;
        }
        if target.exists() {
            eprintln!("{}: {} already exists", input.display(), target.display());
            failures += 1;
            continue;
        }

        println!("{}\n-> {}", input.display(), target.display());
        if !dry_run {
            fs::rename(input, &target).with_context(|| {
                format!("Failed to rename {} to {}", input.display(), target.display())
            })?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} package(s) could not be renamed", failures, inputs.len());
    }
    Ok(())
}

fn read_summary(input: &Path) -> Result<PackageSummary> {
    let file = File::open(input).context("Failed to open package")?;
    read_package(BufReader::new(file)).context("Failed to read package")
}

/// `<author> - <title>.epub`, with path separators replaced
fn package_file_name(summary: &PackageSummary) -> Option<String> {
    let title = summary.title.trim();
    let author = summary.author.trim();
    if title.is_empty() || author.is_empty() {
        return None;
    }
    let name = format!("{author} - {title}").replace(['/', '\\'], "-");
    Some(format!("{name}.epub"))
}
