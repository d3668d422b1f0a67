//! `fns export` command implementation.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;

use super::note::NoteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) note: NoteArgs,

    /// Directory to write the HTML file into.
    #[arg(short, long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read or the file cannot be
    /// written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let pipeline = self.note.pipeline()?;
        let text = self.note.read_note()?;

        let document = pipeline.export(&text, Utc::now());

        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(&document.file_name);
        std::fs::write(&path, &document.html)?;

        tracing::info!(path = %path.display(), "Wrote export");
        output.success(&format!("Exported \"{}\" to {}", document.title, path.display()));
        output.info(&format!("{} bytes", document.html.len()));
        Ok(())
    }
}
