//! Arguments shared by every note command.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use fns_config::{CliSettings, Config};
use fns_embed::{AttachmentContext, LinkMap, load_link_map};
use fns_renderer::NotePipeline;

use crate::error::CliError;
use crate::output::Output;

/// Note source and attachment settings.
#[derive(Args)]
pub(crate) struct NoteArgs {
    /// Path to the note (`-` reads stdin).
    pub(crate) note: PathBuf,

    /// Path to configuration file (default: auto-discover fns.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Vault name (overrides config).
    #[arg(long)]
    pub(crate) vault: Option<String>,

    /// Sync server base URL (overrides config).
    #[arg(long)]
    pub(crate) api_url: Option<String>,

    /// Access token appended to attachment URLs (overrides config).
    #[arg(long, env = "FNS_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// JSON file mapping attachment names to vault paths (overrides config).
    #[arg(long)]
    pub(crate) links: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl NoteArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            vault: self.vault.clone(),
            links: self.links.clone(),
        }
    }

    /// Load configuration and build the rendering pipeline.
    pub(crate) fn pipeline(&self) -> Result<NotePipeline, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let links = match &config.links_path {
            Some(path) => load_link_map(path)?,
            None => LinkMap::new(),
        };

        let context = AttachmentContext::new(&config.api.base_url, &config.vault.name)
            .with_token(&config.api.token)
            .with_links(links);

        Ok(NotePipeline::new(context)
            .with_gfm(config.render.gfm)
            .with_highlighting(config.render.highlight)
            .with_export_title(&config.export.title))
    }

    /// Read the note text.
    pub(crate) fn read_note(&self) -> Result<String, CliError> {
        if self.note == Path::new("-") {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(text);
        }
        Ok(std::fs::read_to_string(&self.note)?)
    }
}

/// Print renderer warnings.
pub(crate) fn print_warnings(output: &Output, warnings: &[String]) {
    for warning in warnings {
        output.warning(&format!("Warning: {warning}"));
    }
}
