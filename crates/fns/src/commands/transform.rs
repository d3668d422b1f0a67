//! `fns transform` command implementation.

use clap::Args;

use super::note::NoteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the transform command.
#[derive(Args)]
pub(crate) struct TransformArgs {
    #[command(flatten)]
    pub(crate) note: NoteArgs,
}

impl TransformArgs {
    /// Execute the transform command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the note cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let pipeline = self.note.pipeline()?;
        let text = self.note.read_note()?;

        output.result(&pipeline.transform(&text))?;
        Ok(())
    }
}
