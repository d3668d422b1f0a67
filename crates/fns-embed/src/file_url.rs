//! Attachment retrieval URLs.

use url::{Url, form_urlencoded};

/// Path of the sync service's attachment retrieval endpoint.
pub const FILE_ENDPOINT: &str = "/api/file";

/// Origin used to resolve relative hrefs when reading their query.
const RELATIVE_BASE: &str = "http://localhost/";

/// Builder for authenticated attachment URLs.
///
/// Produces `<api-base>/api/file?vault=…&path=…&token=…` with every value
/// form-urlencoded. No request is made.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileUrl {
    base: String,
}

impl FileUrl {
    /// Create a builder for the given API base URL.
    ///
    /// A trailing `/` on the base is dropped so the endpoint path joins cleanly.
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut base = api_base.into();
        if base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// API base URL without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build the retrieval URL for an attachment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fns_embed::FileUrl;
    ///
    /// let url = FileUrl::new("https://sync.example.com/").build("notes", "media/clip.mp4", "t0k");
    /// assert_eq!(
    ///     url,
    ///     "https://sync.example.com/api/file?vault=notes&path=media%2Fclip.mp4&token=t0k"
    /// );
    /// ```
    #[must_use]
    pub fn build(&self, vault: &str, path: &str, token: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("vault", vault)
            .append_pair("path", path)
            .append_pair("token", token)
            .finish();
        format!("{}{FILE_ENDPOINT}?{query}", self.base)
    }
}

/// Extract the attachment path an href points at, lower-cased.
///
/// Reads the `path` query parameter of the href (relative hrefs are resolved
/// against a placeholder origin). Falls back to the href itself when there
/// is no such parameter or the href can't be parsed, so plain links to
/// `.mp4` files classify as video too.
#[must_use]
pub fn attachment_path_from_href(href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }

    parse_href(href)
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "path")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| href.to_owned())
        .to_lowercase()
}

fn parse_href(href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(href).ok()
        }
        Err(_) => None,
    }
}
