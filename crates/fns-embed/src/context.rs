//! Inputs shared by every embed in a transform pass.

use crate::file_url::FileUrl;
use crate::link::{LinkMap, resolve_link};

/// Vault, credentials and link map used to rewrite embeds.
///
/// The token is supplied by the caller; this crate never reads credential
/// storage itself.
#[derive(Clone, Debug, Default)]
pub struct AttachmentContext {
    file_url: FileUrl,
    vault: String,
    token: String,
    links: LinkMap,
}

impl AttachmentContext {
    /// Create a context for a vault served from `api_base`.
    #[must_use]
    pub fn new(api_base: impl Into<String>, vault: impl Into<String>) -> Self {
        Self {
            file_url: FileUrl::new(api_base),
            vault: vault.into(),
            token: String::new(),
            links: LinkMap::new(),
        }
    }

    /// Set the access token appended to attachment URLs.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the link map used to resolve short attachment names.
    #[must_use]
    pub fn with_links(mut self, links: LinkMap) -> Self {
        self.links = links;
        self
    }

    #[must_use]
    pub fn vault(&self) -> &str {
        &self.vault
    }

    #[must_use]
    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Resolve an attachment name through the link map.
    #[must_use]
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        resolve_link(raw, &self.links)
    }

    /// Retrieval URL for an already resolved vault path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        self.file_url.build(&self.vault, path, &self.token)
    }
}
