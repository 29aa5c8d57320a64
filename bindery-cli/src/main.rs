//! Bindery CLI - Command-line interface for assembling EPUB packages

mod commands;

use clap::{Parser, Subcommand};
use commands::BuildArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(author, version, about = "Assemble book project directories into EPUB packages", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an EPUB package from a project directory
    Build {
        /// Project directory (meta, chapters/, images/, cover)
        project: PathBuf,

        /// Output path (defaults to the project directory name plus .epub)
        output: Option<PathBuf>,

        /// Write a plain directory tree instead of a zip archive
        #[arg(long)]
        directory: bool,

        #[command(flatten)]
        options: BuildArgs,
    },

    /// Check a project without writing anything
    Check {
        /// Project directory
        project: PathBuf,

        /// Treat markup diagnostics as failures
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        options: BuildArgs,
    },

    /// Create a skeleton project
    Init {
        /// Directory to create
        dir: PathBuf,
    },

    /// Display information about a built package
    Info {
        /// Package file path
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename packages to "<author> - <title>.epub"
    Rename {
        /// Package files to rename
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Print the new names without renaming
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let filter = if cli.verbose {
        "bindery_cli=debug,bindery_core=debug"
    } else {
        "bindery_cli=info,bindery_core=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Build {
            project,
            output,
            directory,
            options,
        } => commands::build(&project, output.as_deref(), directory, &options),

        Commands::Check {
            project,
            strict,
            options,
        } => commands::check(&project, strict, &options),

        Commands::Init { dir } => commands::init(&dir),

        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Rename { inputs, dry_run } => commands::rename(&inputs, dry_run),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
