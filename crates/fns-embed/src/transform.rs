//! Rewriting of `![[...]]` embeds into standard Markdown.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::context::AttachmentContext;
use crate::escape::{escape_html, escape_markdown_text};
use crate::kind::AttachmentKind;

/// Obsidian embed marker: `![[target]]`, `![[target|meta]]`, `![[target#anchor]]`.
static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").unwrap());

/// Sized image tag as written by [`EmbedTransformer`]; `src` and `alt` are
/// escaped, so neither holds a quote or angle bracket.
static SIZED_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<img src="[^"<>]*" alt="[^"<>]*" width="[0-9]+" />\s*$"#).unwrap()
});

/// One parsed embed marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedRef<'a> {
    /// Everything before the first `|`, anchor included.
    pub raw_target: &'a str,
    /// Attachment name: `raw_target` without `#anchor`, trimmed.
    pub path: &'a str,
    /// First `|`-separated metadata segment (display name or width).
    pub display_hint: Option<&'a str>,
}

impl<'a> EmbedRef<'a> {
    /// Parse the inner text of an embed marker.
    ///
    /// Returns `None` when the attachment name is empty.
    #[must_use]
    pub fn parse(inner: &'a str) -> Option<Self> {
        let mut parts = inner.split('|');
        let raw_target = parts.next().unwrap_or_default();
        let display_hint = parts.next();
        let path = raw_target.split('#').next().unwrap_or_default().trim();
        if path.is_empty() {
            return None;
        }
        Some(Self {
            raw_target,
            path,
            display_hint,
        })
    }

    /// Explicit pixel width (`![[img.png|300]]`).
    ///
    /// Only a plain run of ASCII digits counts; `300x200` is a display name.
    #[must_use]
    pub fn width(&self) -> Option<&'a str> {
        self.display_hint
            .filter(|hint| !hint.is_empty() && hint.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Text shown for the embed before Markdown escaping.
    #[must_use]
    pub fn display_name(&self) -> &'a str {
        self.display_hint
            .filter(|hint| !hint.is_empty())
            .unwrap_or(self.path)
            .trim()
    }
}

/// Rewrites embed markers into Markdown pointing at the attachment endpoint.
///
/// Output per attachment kind:
/// - image with width: `<img src="URL" alt="name" width="N" />`
/// - image: `![name](URL)`
/// - video, audio, file: `[🎬 name](URL)`, `[🎵 name](URL)`, `[📎 name](URL)`
///
/// Markers with an empty target are left untouched.
pub struct EmbedTransformer<'c> {
    context: &'c AttachmentContext,
}

impl<'c> EmbedTransformer<'c> {
    #[must_use]
    pub fn new(context: &'c AttachmentContext) -> Self {
        Self { context }
    }

    /// Rewrite every embed marker in `text`.
    ///
    /// Text without markers is returned borrowed and unchanged.
    pub fn transform<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut rewritten = 0usize;
        let result = EMBED_RE.replace_all(text, |caps: &Captures<'_>| {
            if let Some(embed) = EmbedRef::parse(&caps[1]) {
                rewritten += 1;
                self.render(&embed)
            } else {
                tracing::debug!(marker = &caps[0], "Skipping embed with empty target");
                caps[0].to_owned()
            }
        });

        if rewritten > 0 {
            tracing::trace!(count = rewritten, vault = self.context.vault(), "Rewrote embeds");
        }
        result
    }

    /// Parsed embed markers of `text` in document order, malformed ones skipped.
    #[must_use]
    pub fn embeds(text: &str) -> Vec<EmbedRef<'_>> {
        EMBED_RE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|inner| EmbedRef::parse(inner.as_str()))
            .collect()
    }

    fn render(&self, embed: &EmbedRef<'_>) -> String {
        let resolved = self.context.resolve(embed.path);
        let url = self.context.url_for(resolved);
        let kind = AttachmentKind::from_path(resolved);

        // Markdown has no width syntax, so sized images stay raw HTML.
        if kind == AttachmentKind::Image
            && let Some(width) = embed.width()
        {
            return format!(
                r#"<img src="{url}" alt="{}" width="{width}" />"#,
                escape_html(embed.path)
            );
        }

        let display = escape_markdown_text(embed.display_name());
        match kind.marker() {
            Some(marker) => format!("[{marker} {display}]({url})"),
            None => format!("![{display}]({url})"),
        }
    }
}

/// Whether `html` is exactly one sized image tag produced by the rewrite.
///
/// Renderers let this tag through as raw HTML and treat any other inline
/// HTML as text.
///
/// # Examples
///
/// ```
/// use fns_embed::is_sized_image_html;
///
/// assert!(is_sized_image_html(r#"<img src="/api/file?path=a.png" alt="a.png" width="300" />"#));
/// assert!(!is_sized_image_html(r#"<img src=x onerror="alert(1)">"#));
/// ```
#[must_use]
pub fn is_sized_image_html(html: &str) -> bool {
    SIZED_IMAGE_RE.is_match(html)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::LinkMap;

    const API: &str = "http://api.test";

    fn context(vault: &str, links: &[(&str, &str)], token: &str) -> AttachmentContext {
        let links: LinkMap = links
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AttachmentContext::new(API, vault)
            .with_token(token)
            .with_links(links)
    }

    fn transform(text: &str, ctx: &AttachmentContext) -> String {
        EmbedTransformer::new(ctx).transform(text).into_owned()
    }

    #[test]
    fn test_image_with_width() {
        let ctx = context("notes", &[], "abc");
        let out = transform("See ![[diagram.png|100]] for details", &ctx);
        assert_eq!(
            out,
            format!(
                r#"See <img src="{API}/api/file?vault=notes&path=diagram.png&token=abc" alt="diagram.png" width="100" /> for details"#
            )
        );
        assert!(!out.contains("!["));
    }

    #[test]
    fn test_video_resolved_through_links() {
        let ctx = context("v", &[("clip.mp4", "media/clip.mp4")], "t");
        let out = transform("![[clip.mp4]]", &ctx);
        assert_eq!(
            out,
            format!("[🎬 clip.mp4]({API}/api/file?vault=v&path=media%2Fclip.mp4&token=t)")
        );
    }

    #[test]
    fn test_plain_image() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[photo.jpg]]", &ctx);
        assert_eq!(
            out,
            format!("![photo.jpg]({API}/api/file?vault=notes&path=photo.jpg&token=abc)")
        );
    }

    #[test]
    fn test_audio_and_file_markers() {
        let ctx = context("notes", &[], "abc");
        assert!(transform("![[song.mp3]]", &ctx).starts_with("[🎵 song.mp3]("));
        assert!(transform("![[report.pdf]]", &ctx).starts_with("[📎 report.pdf]("));
    }

    #[test]
    fn test_label_replaces_display_name() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[report.pdf|Q3 [draft (v2)]]", &ctx);
        assert!(out.starts_with(r"[📎 Q3 \[draft \(v2\)]("), "{out}");
    }

    #[test]
    fn test_closing_bracket_in_label_is_not_an_embed() {
        let ctx = context("notes", &[], "abc");
        let text = "![[report.pdf|Q3 [final] (v2)]]";
        assert_eq!(transform(text, &ctx), text);
    }

    #[test]
    fn test_image_label_is_alt_text() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[photo.jpg|Sunset]]", &ctx);
        assert!(out.starts_with("![Sunset]("), "{out}");
    }

    #[test]
    fn test_non_numeric_meta_is_display_name() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[photo.jpg|300x200]]", &ctx);
        assert!(out.starts_with("![300x200]("), "{out}");
        assert!(!out.contains("width="));
    }

    #[test]
    fn test_numeric_meta_on_non_image_is_label() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[clip.mp4|100]]", &ctx);
        assert!(out.starts_with("[🎬 100]("), "{out}");
    }

    #[test]
    fn test_missing_link_falls_back_to_literal_name() {
        let ctx = context("notes", &[("other.png", "img/other.png")], "abc");
        let out = transform("![[Screenshot 2024.png]]", &ctx);
        assert!(out.contains("path=Screenshot+2024.png&"), "{out}");
    }

    #[test]
    fn test_anchor_is_discarded() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[guide.pdf#page=3]]", &ctx);
        assert!(out.starts_with("[📎 guide.pdf]("), "{out}");
        assert!(out.contains("path=guide.pdf&"), "{out}");
    }

    #[test]
    fn test_anchor_with_width() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[photo.png#crop|250]]", &ctx);
        assert!(out.contains(r#"width="250""#), "{out}");
        assert!(out.contains(r#"alt="photo.png""#), "{out}");
    }

    #[test]
    fn test_target_is_trimmed() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[  photo.png  ]]", &ctx);
        assert!(out.starts_with("![photo.png]("), "{out}");
    }

    #[test]
    fn test_no_markers_is_identity() {
        let ctx = context("notes", &[], "abc");
        let text = "# Title\n\nPlain [link](x.md) and ![img](a.png) and [[wikilink]].";
        let out = EmbedTransformer::new(&ctx).transform(text);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, text);
    }

    #[test]
    fn test_empty_marker_left_literal() {
        let ctx = context("notes", &[], "abc");
        assert_eq!(transform("before ![[]] after", &ctx), "before ![[]] after");
    }

    #[test]
    fn test_blank_target_left_literal() {
        let ctx = context("notes", &[], "abc");
        assert_eq!(transform("![[   ]]", &ctx), "![[   ]]");
        assert_eq!(transform("![[#only-anchor]]", &ctx), "![[#only-anchor]]");
        assert_eq!(transform("![[|label]]", &ctx), "![[|label]]");
    }

    #[test]
    fn test_every_marker_rewritten_in_order() {
        let ctx = context("notes", &[], "abc");
        let out = transform("![[a.png]] ![[b.mp4]] ![[]] ![[c.mp3]] ![[a.png]]", &ctx);
        let a = out.find("path=a.png").unwrap();
        let b = out.find("path=b.mp4").unwrap();
        let c = out.find("path=c.mp3").unwrap();
        assert!(a < b && b < c);
        assert_eq!(out.matches("path=a.png").count(), 2);
        assert_eq!(out.matches("/api/file?").count(), 4);
        assert!(out.contains("![[]]"));
    }

    #[test]
    fn test_alt_attribute_is_html_escaped() {
        let ctx = context("notes", &[], "abc");
        let out = transform(r#"![[a "quoted".png|40]]"#, &ctx);
        assert!(out.contains(r#"alt="a &quot;quoted&quot;.png""#), "{out}");
        assert!(is_sized_image_html(&out), "{out}");
    }

    #[test]
    fn test_sized_image_html_shape() {
        let ctx = context("My Vault", &[], "a+b");
        let out = transform("![[<b>.png|300]]", &ctx);
        assert!(is_sized_image_html(&out), "{out}");
        assert!(is_sized_image_html(&format!("{out}\n")));

        assert!(!is_sized_image_html(&format!("{out} {out}")));
        assert!(!is_sized_image_html(r#"<img src="a.png" width="10" />"#));
        assert!(!is_sized_image_html(r#"<img src="a.png" alt="a" width="10" onload="x" />"#));
        assert!(!is_sized_image_html("<b>bold</b>"));
    }

    #[test]
    fn test_embeds_lists_parsed_markers() {
        let embeds = EmbedTransformer::embeds("![[a.png|100]] text ![[]] ![[b.pdf#p2]]");
        assert_eq!(
            embeds,
            vec![
                EmbedRef {
                    raw_target: "a.png",
                    path: "a.png",
                    display_hint: Some("100"),
                },
                EmbedRef {
                    raw_target: "b.pdf#p2",
                    path: "b.pdf",
                    display_hint: None,
                },
            ]
        );
    }

    #[test]
    fn test_embed_ref_width() {
        let embed = EmbedRef::parse("a.png|100|extra").unwrap();
        assert_eq!(embed.width(), Some("100"));
        assert_eq!(EmbedRef::parse("a.png| 100").unwrap().width(), None);
        assert_eq!(EmbedRef::parse("a.png|").unwrap().width(), None);
    }

    #[test]
    fn test_embed_ref_display_name() {
        assert_eq!(EmbedRef::parse("a.png").unwrap().display_name(), "a.png");
        assert_eq!(EmbedRef::parse("a.png|").unwrap().display_name(), "a.png");
        assert_eq!(
            EmbedRef::parse("a.png| Caption ").unwrap().display_name(),
            "Caption"
        );
    }
}
