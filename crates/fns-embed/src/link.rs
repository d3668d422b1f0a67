//! Attachment name resolution against a vault's link map.

use std::collections::HashMap;
use std::path::Path;

/// Short attachment name to canonical vault-relative path.
pub type LinkMap = HashMap<String, String>;

/// Link map loading error.
#[derive(Debug, thiserror::Error)]
pub enum LinkMapError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("Link map parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolve an attachment name to its vault path.
///
/// Returns the mapped path when `raw` is a key with a non-empty value,
/// otherwise `raw` itself.
///
/// # Examples
///
/// ```
/// use fns_embed::{LinkMap, resolve_link};
///
/// let mut links = LinkMap::new();
/// links.insert("clip.mp4".to_owned(), "media/clip.mp4".to_owned());
///
/// assert_eq!(resolve_link("clip.mp4", &links), "media/clip.mp4");
/// assert_eq!(resolve_link("other.png", &links), "other.png");
/// ```
#[must_use]
pub fn resolve_link<'a>(raw: &'a str, links: &'a LinkMap) -> &'a str {
    links
        .get(raw)
        .map(String::as_str)
        .filter(|path| !path.is_empty())
        .unwrap_or(raw)
}

/// Parse a link map from a JSON object of name/path pairs.
pub fn parse_link_map(json: &str) -> Result<LinkMap, LinkMapError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a link map from a JSON file.
pub fn load_link_map(path: &Path) -> Result<LinkMap, LinkMapError> {
    let content = std::fs::read_to_string(path)?;
    let links = parse_link_map(&content)?;
    tracing::debug!(path = %path.display(), count = links.len(), "Loaded link map");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn links(pairs: &[(&str, &str)]) -> LinkMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_resolve_mapped_name() {
        let map = links(&[("diagram.png", "assets/diagram.png")]);
        assert_eq!(resolve_link("diagram.png", &map), "assets/diagram.png");
    }

    #[test]
    fn test_resolve_missing_name_is_identity() {
        let map = links(&[("diagram.png", "assets/diagram.png")]);
        assert_eq!(resolve_link("photo.jpg", &map), "photo.jpg");
    }

    #[test]
    fn test_resolve_empty_mapping_falls_back() {
        let map = links(&[("diagram.png", "")]);
        assert_eq!(resolve_link("diagram.png", &map), "diagram.png");
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let map = links(&[("Diagram.png", "assets/Diagram.png")]);
        assert_eq!(resolve_link("diagram.png", &map), "diagram.png");
    }

    #[test]
    fn test_parse_link_map() {
        let map = parse_link_map(r#"{"clip.mp4": "media/clip.mp4", "a.png": "img/a.png"}"#)
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["clip.mp4"], "media/clip.mp4");
    }

    #[test]
    fn test_parse_link_map_rejects_non_object() {
        let err = parse_link_map(r#"["clip.mp4"]"#).unwrap_err();
        assert!(matches!(err, LinkMapError::Parse(_)));
    }

    #[test]
    fn test_load_link_map_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"song.mp3": "audio/song.mp3"}}"#).unwrap();

        let map = load_link_map(file.path()).unwrap();
        assert_eq!(map["song.mp3"], "audio/song.mp3");
    }

    #[test]
    fn test_load_link_map_missing_file() {
        let err = load_link_map(Path::new("/nonexistent/links.json")).unwrap_err();
        assert!(matches!(err, LinkMapError::Io(_)));
    }
}
