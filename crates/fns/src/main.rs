//! FNS CLI - vault note renderer.
//!
//! Provides commands for:
//! - `transform`: Rewrite attachment embeds into standard Markdown
//! - `preview`: Render a note as a JSON view tree
//! - `export`: Write a note as a standalone HTML document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, PreviewArgs, TransformArgs};
use output::Output;

/// FNS - render vault notes with their attachments.
#[derive(Parser)]
#[command(name = "fns", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a note with embeds rewritten to attachment URLs.
    Transform(TransformArgs),
    /// Print the preview view tree of a note as JSON.
    Preview(PreviewArgs),
    /// Export a note to a standalone HTML file.
    Export(ExportArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Transform(args) => args.note.verbose,
            Self::Preview(args) => args.note.verbose,
            Self::Export(args) => args.note.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG
    let filter = if cli.command.verbose() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Transform(args) => args.execute(),
        Commands::Preview(args) => args.execute(),
        Commands::Export(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
