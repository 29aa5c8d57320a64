//! Build command implementation

use super::report_diagnostics;
use anyhow::{bail, Context, Result};
use bindery_core::{
    Assembler, BuildOptions, CoverLinkage, CoverPolicy, DirectorySink, EntrySink, FsSource,
    PreparedPackage, ZipSink,
};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

/// Options shared by `build` and `check`
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Fail when the project has no cover image
    #[arg(long)]
    require_cover: bool,

    /// How the package links its cover image
    #[arg(long, value_enum, default_value_t = LinkageArg::Meta)]
    cover_linkage: LinkageArg,

    /// Stylesheet to use instead of the bundled one
    #[arg(long)]
    stylesheet: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LinkageArg {
    /// <meta name="cover"> in the package metadata
    Meta,
    /// properties="cover-image" on the manifest item
    Property,
}

impl BuildArgs {
    pub fn options(&self) -> BuildOptions {
        let mut options = BuildOptions::new()
            .with_cover_policy(if self.require_cover {
                CoverPolicy::Required
            } else {
                CoverPolicy::Optional
            })
            .with_cover_linkage(match self.cover_linkage {
                LinkageArg::Meta => CoverLinkage::MetaTag,
                LinkageArg::Property => CoverLinkage::ItemProperty,
            });
        if let Some(path) = &self.stylesheet {
            options = options.with_stylesheet(path);
        }
        options
    }
}

/// Read, check and generate everything, touching no output
pub(super) fn prepare(project: &Path, args: &BuildArgs) -> Result<PreparedPackage> {
    if !project.is_dir() {
        bail!("Project directory not found: {}", project.display());
    }
    if let Some(stylesheet) = &args.stylesheet {
        if !stylesheet.is_file() {
            bail!("Stylesheet not found: {}", stylesheet.display());
        }
    }

    let source = FsSource::new(project);
    let package = Assembler::new(args.options())
        .prepare(&source)
        .with_context(|| format!("Failed to assemble {}", project.display()))?;

    tracing::info!(
        "Prepared '{}' with {} chapters and {} images",
        package.title,
        package.chapter_count,
        package.image_count
    );
    report_diagnostics(package.diagnostics());
    Ok(package)
}

/// Build a package from a project directory
pub fn build(
    project: &Path,
    output: Option<&Path>,
    directory: bool,
    args: &BuildArgs,
) -> Result<()> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(project, directory)?,
    };

    // Nothing is created until the project has passed every check
    let package = prepare(project, args)?;

    if directory {
        if output.exists() {
            bail!("Output directory already exists: {}", output.display());
        }
        let mut sink = DirectorySink::new(&output);
        write(&package, &mut sink, &output)?;
    } else {
        let mut sink = ZipSink::create(&output)
            .with_context(|| format!("Failed to create output file: {}", output.display()))?;
        write(&package, &mut sink, &output)?;
    }

    println!(
        "Built '{}' ({} chapters, {} images{}) -> {}",
        package.title,
        package.chapter_count,
        package.image_count,
        if package.has_cover { ", cover" } else { "" },
        output.display()
    );
    Ok(())
}

fn write(package: &PreparedPackage, sink: &mut dyn EntrySink, output: &Path) -> Result<()> {
    package
        .write_to(sink)
        .with_context(|| format!("Failed to write {}", output.display()))
}

/// `<project>.epub` (or `<project>-epub` for a directory) next to the project
fn default_output(project: &Path, directory: bool) -> Result<PathBuf> {
    let raw = project.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', '\\']);

    let base = if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        let absolute = project
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", project.display()))?;
        if absolute.file_name().is_none() {
            bail!("Cannot derive an output name; pass an output path");
        }
        absolute.to_string_lossy().into_owned()
    } else {
        trimmed.to_string()
    };

    let suffix = if directory { "-epub" } else { ".epub" };
    Ok(PathBuf::from(format!("{base}{suffix}")))
}
