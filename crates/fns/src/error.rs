//! CLI error types.

use fns_config::ConfigError;
use fns_embed::LinkMapError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    LinkMap(#[from] LinkMapError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize preview: {0}")]
    Json(#[from] serde_json::Error),
}
