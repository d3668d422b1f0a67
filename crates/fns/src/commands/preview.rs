//! `fns preview` command implementation.

use clap::Args;
use fns_renderer::{TocEntry, ViewNode};
use serde::Serialize;

use super::note::{NoteArgs, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    pub(crate) note: NoteArgs,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub(crate) compact: bool,
}

/// JSON document printed by the preview command.
#[derive(Serialize)]
struct PreviewJson<'a> {
    title: Option<&'a str>,
    toc: &'a [TocEntry],
    nodes: &'a [ViewNode],
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the note cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let pipeline = self.note.pipeline()?;
        let text = self.note.read_note()?;

        let result = pipeline.preview(&text);
        print_warnings(&output, &result.warnings);

        let json = PreviewJson {
            title: result.title.as_deref(),
            toc: &result.toc,
            nodes: &result.output,
        };
        let rendered = if self.compact {
            serde_json::to_string(&json)?
        } else {
            serde_json::to_string_pretty(&json)?
        };
        output.result(&rendered)?;
        Ok(())
    }
}
